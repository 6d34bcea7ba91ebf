//! Named, versioned view preferences over a key/value store.
//!
//! Each preference is a [`PrefEntry`] with its own storage key and schema
//! version, persisted as `{"v": <version>, "data": <value>}`. Loading never
//! fails: a missing, outdated or corrupt entry falls back to the default
//! value with a warning.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::prefs::{RECENT_PATHS_KEY, RECENT_PATHS_MAX, TREE_EXPANSION_KEY, VIEW_KEY};
use crate::error::StoreError;
use crate::keys;
use crate::models::{BrowseContext, FilterState, Sort, TypeFilter};

// =============================================================================
// Stores
// =============================================================================

/// Synchronous string key/value storage (localStorage and friends).
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed Entries
// =============================================================================

/// A persisted preference value.
pub trait PrefEntry: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
    /// Bump when the stored shape changes incompatibly.
    const VERSION: u32;
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    v: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    v: u32,
    data: serde_json::Value,
}

/// Load a preference, falling back to its default.
pub fn load_pref<P: PrefEntry, S: KvStore + ?Sized>(store: &S) -> P {
    let raw = match store.get(P::KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return P::default(),
        Err(e) => {
            log::warn!("failed to read preference '{}': {e}", P::KEY);
            return P::default();
        }
    };
    let envelope: RawEnvelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::warn!("discarding corrupt preference '{}': {e}", P::KEY);
            return P::default();
        }
    };
    if envelope.v != P::VERSION {
        log::warn!(
            "discarding preference '{}' with version {} (expected {})",
            P::KEY,
            envelope.v,
            P::VERSION
        );
        return P::default();
    }
    serde_json::from_value(envelope.data).unwrap_or_else(|e| {
        log::warn!("discarding undecodable preference '{}': {e}", P::KEY);
        P::default()
    })
}

/// Persist a preference under its key and version.
pub fn save_pref<P: PrefEntry, S: KvStore + ?Sized>(store: &S, value: &P) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&Envelope {
        v: P::VERSION,
        data: value,
    })
    .map_err(|e| StoreError::Serialize {
        key: P::KEY.to_string(),
        reason: e.to_string(),
    })?;
    store.set(P::KEY, &raw)
}

pub fn clear_pref<P: PrefEntry, S: KvStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    store.remove(P::KEY)
}

// =============================================================================
// View Preferences
// =============================================================================

/// Sort, type filter and UI mode remembered across sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewPrefs {
    pub sort: Sort,
    pub type_filter: TypeFilter,
    pub favorites_first: bool,
    pub is_advanced: bool,
}

impl PrefEntry for ViewPrefs {
    const KEY: &'static str = VIEW_KEY;
    const VERSION: u32 = 1;
}

impl ViewPrefs {
    pub fn from_filter(filter: &FilterState, is_advanced: bool) -> Self {
        Self {
            sort: filter.sort,
            type_filter: filter.type_filter,
            favorites_first: filter.favorites_first,
            is_advanced,
        }
    }

    /// Initial filter state for a new session.
    pub fn to_filter(&self) -> FilterState {
        FilterState {
            sort: self.sort,
            type_filter: self.type_filter,
            favorites_first: self.favorites_first,
            ..Default::default()
        }
    }
}

// =============================================================================
// Recent Paths
// =============================================================================

/// Recently visited locations, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentPaths {
    pub entries: Vec<BrowseContext>,
}

impl PrefEntry for RecentPaths {
    const KEY: &'static str = RECENT_PATHS_KEY;
    const VERSION: u32 = 1;
}

impl RecentPaths {
    /// Move `context` to the front, deduplicated and bounded.
    pub fn visit(&mut self, context: &BrowseContext) {
        self.entries.retain(|c| c != context);
        self.entries.insert(0, context.clone());
        self.entries.truncate(RECENT_PATHS_MAX);
    }

    /// Forget every location in a bucket (e.g. after it was deleted).
    pub fn forget_bucket(&mut self, profile_id: &str, bucket: &str) {
        self.entries
            .retain(|c| !(c.profile_id == profile_id && c.bucket == bucket));
    }
}

// =============================================================================
// Tree Expansion
// =============================================================================

/// Expanded prefixes of the folder tree, per bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeExpansion {
    pub buckets: BTreeMap<String, BTreeSet<String>>,
}

impl PrefEntry for TreeExpansion {
    const KEY: &'static str = TREE_EXPANSION_KEY;
    const VERSION: u32 = 1;
}

impl TreeExpansion {
    pub fn is_expanded(&self, bucket: &str, prefix: &str) -> bool {
        self.buckets
            .get(bucket)
            .is_some_and(|set| set.contains(&keys::normalize_prefix(prefix)))
    }

    pub fn expand(&mut self, bucket: &str, prefix: &str) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(keys::normalize_prefix(prefix));
    }

    /// Collapse `prefix` and everything nested below it.
    pub fn collapse(&mut self, bucket: &str, prefix: &str) {
        let prefix = keys::normalize_prefix(prefix);
        if let Some(set) = self.buckets.get_mut(bucket) {
            set.retain(|p| !p.starts_with(&prefix));
            if set.is_empty() {
                self.buckets.remove(bucket);
            }
        }
    }

    /// Flip a prefix; returns whether it is now expanded.
    pub fn toggle(&mut self, bucket: &str, prefix: &str) -> bool {
        if self.is_expanded(bucket, prefix) {
            self.collapse(bucket, prefix);
            false
        } else {
            self.expand(bucket, prefix);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDir, SortKey};

    #[test]
    fn test_missing_pref_is_default() {
        let store = MemoryStore::default();
        assert_eq!(load_pref::<ViewPrefs, _>(&store), ViewPrefs::default());
    }

    #[test]
    fn test_save_and_load_view_prefs() {
        let store = MemoryStore::default();
        let prefs = ViewPrefs {
            sort: Sort::new(SortKey::Time, SortDir::Desc),
            is_advanced: true,
            ..Default::default()
        };
        save_pref(&store, &prefs).unwrap();
        let raw = store.get(VIEW_KEY).unwrap().unwrap();
        assert!(raw.starts_with(r#"{"v":1,"data":"#));
        assert_eq!(load_pref::<ViewPrefs, _>(&store), prefs);

        clear_pref::<ViewPrefs, _>(&store).unwrap();
        assert_eq!(store.get(VIEW_KEY).unwrap(), None);
    }

    #[test]
    fn test_version_mismatch_falls_back() {
        let store = MemoryStore::default();
        store
            .set(VIEW_KEY, r#"{"v":0,"data":{"isAdvanced":true}}"#)
            .unwrap();
        assert_eq!(load_pref::<ViewPrefs, _>(&store), ViewPrefs::default());
    }

    #[test]
    fn test_corrupt_pref_falls_back() {
        let store = MemoryStore::default();
        store.set(RECENT_PATHS_KEY, "not json").unwrap();
        assert_eq!(load_pref::<RecentPaths, _>(&store), RecentPaths::default());
        store.set(RECENT_PATHS_KEY, r#"{"v":1,"data":{"entries":42}}"#).unwrap();
        assert_eq!(load_pref::<RecentPaths, _>(&store), RecentPaths::default());
    }

    #[test]
    fn test_view_prefs_filter_round_trip() {
        let filter = FilterState {
            sort: Sort::new(SortKey::Size, SortDir::Asc),
            favorites_first: true,
            ext_filter: "pdf".to_string(),
            ..Default::default()
        };
        let prefs = ViewPrefs::from_filter(&filter, false);
        let restored = prefs.to_filter();
        assert_eq!(restored.sort, filter.sort);
        assert!(restored.favorites_first);
        assert_eq!(restored.ext_filter, "");
    }

    #[test]
    fn test_recent_paths_bounded_and_deduplicated() {
        let mut recent = RecentPaths::default();
        for i in 0..15 {
            recent.visit(&BrowseContext::new("p", "b", format!("dir{i}/")));
        }
        recent.visit(&BrowseContext::new("p", "b", "dir10/"));
        assert_eq!(recent.entries.len(), RECENT_PATHS_MAX);
        assert_eq!(recent.entries[0].prefix, "dir10/");
        assert_eq!(recent.entries[1].prefix, "dir14/");
        assert_eq!(recent.entries.iter().filter(|c| c.prefix == "dir10/").count(), 1);

        recent.forget_bucket("p", "b");
        assert!(recent.entries.is_empty());
    }

    #[test]
    fn test_tree_expansion_collapse_nested() {
        let mut tree = TreeExpansion::default();
        tree.expand("b", "a");
        tree.expand("b", "a/b/");
        tree.expand("b", "c/");
        assert!(tree.is_expanded("b", "a/"));
        assert!(!tree.toggle("b", "a/"));
        assert!(!tree.is_expanded("b", "a/b/"));
        assert!(tree.is_expanded("b", "c/"));
        assert!(tree.toggle("b", "a/"));

        let store = MemoryStore::default();
        save_pref(&store, &tree).unwrap();
        assert_eq!(load_pref::<TreeExpansion, _>(&store), tree);
    }
}

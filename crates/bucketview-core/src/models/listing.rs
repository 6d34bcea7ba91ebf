//! Storage listing types as returned by the object API.

use std::collections::HashMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Objects
// =============================================================================

/// A single stored object. Immutable once returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectItem {
    /// Unique within the bucket.
    pub key: String,
    pub size: u64,
    /// ISO-8601 timestamp as sent by the server.
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ObjectItem {
    pub fn new(key: impl Into<String>, size: u64, last_modified: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: last_modified.into(),
            etag: None,
            storage_class: None,
        }
    }

    /// Last-modified time in Unix milliseconds, if the timestamp parses.
    pub fn last_modified_ms(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(self.last_modified.trim())
            .ok()
            .map(|dt| dt.timestamp_millis())
    }
}

// =============================================================================
// Pages
// =============================================================================

/// One page of a delimiter listing.
///
/// Page boundaries are opaque; the engine only ever looks at the
/// concatenation of all pages fetched for the current context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub delimiter: String,
    #[serde(default)]
    pub common_prefixes: Vec<String>,
    #[serde(default)]
    pub items: Vec<ObjectItem>,
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(
        default,
        rename = "nextContinuationToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_token: Option<String>,
}

impl ListingPage {
    /// Number of raw entries (prefixes plus objects) on this page.
    pub fn raw_len(&self) -> usize {
        self.common_prefixes.len() + self.items.len()
    }
}

/// One page of indexed search results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub items: Vec<ObjectItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl From<SearchPage> for ListingPage {
    fn from(page: SearchPage) -> Self {
        Self {
            bucket: page.bucket,
            prefix: page.prefix,
            delimiter: String::new(),
            common_prefixes: Vec::new(),
            items: page.items,
            is_truncated: page.next_cursor.is_some(),
            next_token: page.next_cursor,
        }
    }
}

/// Whether more pages can be fetched after the last page of a working set.
pub fn has_more_pages(pages: &[ListingPage]) -> bool {
    pages.last().is_some_and(|p| p.is_truncated)
}

/// Total raw entries across all fetched pages.
pub fn raw_total(pages: &[ListingPage]) -> usize {
    pages.iter().map(ListingPage::raw_len).sum()
}

// =============================================================================
// Favorites
// =============================================================================

/// A favorited object with the time it was starred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteObject {
    #[serde(flatten)]
    pub object: ObjectItem,
    #[serde(default)]
    pub created_at: String,
}

/// Favorites for one bucket, indexed by key, in server order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    items: Vec<FavoriteObject>,
    index: HashMap<String, usize>,
}

impl FavoriteSet {
    pub fn new(items: Vec<FavoriteObject>) -> Self {
        let mut set = Self::default();
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Insert or replace a favorite.
    pub fn insert(&mut self, item: FavoriteObject) {
        match self.index.get(&item.object.key) {
            Some(&idx) => self.items[idx] = item,
            None => {
                self.index.insert(item.object.key.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// Remove a favorite, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };
        self.items.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteObject> {
        self.items.iter()
    }

    /// Favorites whose key lives under `prefix` (at any depth).
    pub fn under_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ObjectItem> {
        self.items
            .iter()
            .map(|f| &f.object)
            .filter(move |o| o.key.starts_with(prefix) && o.key != prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fav(key: &str) -> FavoriteObject {
        FavoriteObject {
            object: ObjectItem::new(key, 1, "2024-01-01T00:00:00Z"),
            created_at: "2024-02-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_parse_listing_page() {
        let json = r#"{
            "bucket": "media",
            "prefix": "photos/",
            "delimiter": "/",
            "commonPrefixes": ["photos/2023/", "photos/2024/"],
            "items": [{"key": "photos/a.jpg", "size": 10, "lastModified": "2024-01-02T03:04:05.000Z", "etag": "\"abc\""}],
            "nextContinuationToken": "tok",
            "isTruncated": true
        }"#;
        let page: ListingPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.common_prefixes.len(), 2);
        assert_eq!(page.items[0].etag.as_deref(), Some("\"abc\""));
        assert_eq!(page.next_token.as_deref(), Some("tok"));
        assert_eq!(page.raw_len(), 3);
        assert!(has_more_pages(&[page]));
    }

    #[test]
    fn test_last_modified_ms() {
        let item = ObjectItem::new("a", 0, "1970-01-01T00:00:01Z");
        assert_eq!(item.last_modified_ms(), Some(1000));
        let bad = ObjectItem::new("a", 0, "yesterday");
        assert_eq!(bad.last_modified_ms(), None);
    }

    #[test]
    fn test_search_page_into_listing() {
        let page = SearchPage {
            bucket: "b".to_string(),
            items: vec![ObjectItem::new("x", 1, "")],
            next_cursor: Some("c".to_string()),
            ..Default::default()
        };
        let listing: ListingPage = page.into();
        assert!(listing.common_prefixes.is_empty());
        assert!(listing.is_truncated);
        assert_eq!(listing.next_token.as_deref(), Some("c"));
    }

    #[test]
    fn test_favorite_set_insert_remove() {
        let mut set = FavoriteSet::new(vec![fav("a"), fav("b"), fav("c")]);
        assert!(set.contains("b"));
        assert!(set.remove("b"));
        assert!(!set.remove("b"));
        assert!(set.contains("c"));
        let keys: Vec<_> = set.iter().map(|f| f.object.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_favorites_under_prefix() {
        let set = FavoriteSet::new(vec![fav("docs/a.md"), fav("docs/deep/b.md"), fav("other/c.md")]);
        let keys: Vec<_> = set.under_prefix("docs/").map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/a.md", "docs/deep/b.md"]);
    }

    #[test]
    fn test_favorite_json_is_flat() {
        let json = r#"{"key":"a","size":3,"lastModified":"2024-01-01T00:00:00Z","createdAt":"2024-02-01T00:00:00Z"}"#;
        let parsed: FavoriteObject = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.object.key, "a");
        assert_eq!(parsed.created_at, "2024-02-01T00:00:00Z");
    }
}

//! localStorage-backed preference store.
//!
//! Preferences survive reloads; quota and privacy-mode failures surface as
//! [`StoreError`] and are logged by the caller, never shown as hard errors.

use bucketview_core::StoreError;
use bucketview_core::prefs::{KvStore, PrefEntry, load_pref, save_pref};

use super::dom;

/// [`KvStore`] over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl KvStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = dom::local_storage().ok_or(StoreError::Unavailable)?;
        storage.get_item(key).map_err(|_| StoreError::Unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = dom::local_storage().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(|_| StoreError::Write {
            key: key.to_string(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let storage = dom::local_storage().ok_or(StoreError::Unavailable)?;
        storage.remove_item(key).map_err(|_| StoreError::Write {
            key: key.to_string(),
        })
    }
}

/// Load a preference from localStorage.
pub fn load<P: PrefEntry>() -> P {
    load_pref(&LocalStorageStore)
}

/// Save a preference, logging failures.
pub fn save<P: PrefEntry>(value: &P) {
    if let Err(e) = save_pref(&LocalStorageStore, value) {
        log::warn!("failed to save preference '{}': {e}", P::KEY);
    }
}

//! Browser storage
//!
//! `localStorage` behind the view model's key/value store trait.

use planfact::{KeyValueStore, StoreError, StoreResult};
use web_sys::Storage;

use crate::dom;

/// Key/value store backed by `window.localStorage`
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// Open the page's local storage. Without it reads find nothing and
    /// writes fail.
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            dom::log_warn("localStorage unavailable, view state will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> StoreResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_local_store_round_trip() {
        let mut store = LocalStore::open();
        store.set("planFactReport_activeTab", "#analysis").unwrap();
        assert_eq!(store.get("planFactReport_activeTab").as_deref(), Some("#analysis"));

        // A second handle reads the same page storage
        let reopened = LocalStore::open();
        assert_eq!(reopened.get("planFactReport_activeTab").as_deref(), Some("#analysis"));

        store.remove("planFactReport_activeTab").unwrap();
        assert_eq!(store.get("planFactReport_activeTab"), None);
    }

    #[wasm_bindgen_test]
    fn test_missing_storage_rejects_writes() {
        let mut store = LocalStore { storage: None };
        assert_eq!(store.get("k"), None);
        assert!(matches!(store.set("k", "v"), Err(StoreError::Unavailable(_))));
    }
}

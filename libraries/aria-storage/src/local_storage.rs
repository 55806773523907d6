//! Browser `localStorage` backend

use crate::backend::KeyValueStore;
use crate::error::{Result, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Store over `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the page's `localStorage`
    ///
    /// Fails when storage is disabled (private browsing, sandboxed frames).
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        // setItem throws QuotaExceededError when full
        self.storage.set_item(key, value).map_err(|e| {
            let reason = describe(&e);
            if reason.contains("Quota") {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: key.len() + value.len(),
                    available: 0,
                }
            } else {
                StorageError::Unavailable(reason)
            }
        })
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

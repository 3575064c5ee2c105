//! `localStorage` adapter.

use pedido_listo::storage::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;

/// The page's `localStorage`, looked up on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|error| StorageError::Unavailable(js_message(&error)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local()?
            .get_item(key)
            .map_err(|error| StorageError::Unavailable(js_message(&error)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local()?
            .set_item(key, value)
            .map_err(|error| StorageError::Unavailable(js_message(&error)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::local()?
            .remove_item(key)
            .map_err(|error| StorageError::Unavailable(js_message(&error)))
    }
}

pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

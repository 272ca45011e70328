use compute::error::StorageError;
use compute::history::LogStorage;
use wasm_bindgen::JsValue;
use web_sys::{window, Storage};

/// `window.localStorage` as a [`LogStorage`] backend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserStorage;

fn js_message(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

impl BrowserStorage {
    fn local_storage(&self) -> Result<Storage, StorageError> {
        window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_message(e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl LogStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(js_message(e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Fails with a QuotaExceededError when the origin is out of space
        self.local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(js_message(e)))
    }
}

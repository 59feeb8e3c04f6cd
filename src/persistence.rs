use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result, StorageError};

/// Synchronous string key-value surface the game persists through.
///
/// Browser local storage in production, [`MemoryStore`] everywhere else.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError>;
    fn remove(&self, key: &str) -> std::result::Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use web_sys::Storage;

    use super::KeyValueStore;
    use crate::error::StorageError;

    pub struct BrowserStorage {
        storage: Storage,
    }

    impl BrowserStorage {
        pub fn local() -> Option<Self> {
            let window = web_sys::window()?;
            let storage = window.local_storage().ok().flatten()?;
            Some(Self { storage })
        }
    }

    fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
        StorageError(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    impl KeyValueStore for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage.get_item(key).map_err(js_error)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage.set_item(key, value).map_err(js_error)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.storage.remove_item(key).map_err(js_error)
        }
    }
}

pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| Error::MalformedPersistedData {
            key: key.to_string(),
            source,
        })
}

/// Like [`load_json`], but any failure yields the default value.
pub fn load_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> T {
    match load_json(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            warn!("treating `{key}` as empty: {err}");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_string(value)
        .map_err(|err| StorageError(format!("failed to encode `{key}`: {err}")))?;
    store.set(key, &encoded)?;
    Ok(())
}

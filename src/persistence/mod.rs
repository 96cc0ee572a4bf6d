//! Key-value persistence
//!
//! Features:
//! - Injected `KeyValueStore` trait (no ambient global storage)
//! - In-memory store for tests and headless runs
//! - Single JSON file store with tmp → rename writes (native)
//! - LocalStorage store (web)
//!
//! Callers treat read failures and malformed values as "no record" and log
//! write failures instead of propagating them as fatal.

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage with a `get`/`set` contract
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Write several keys as one unit. Stores that can batch should override
    /// this.
    ///
    /// On failure the keys already written are restored to their previous
    /// values (best effort, newest first) before the error is returned.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());
        for &(key, ref value) in entries {
            let result = match self.get(key) {
                Ok(previous) => self.set(key, value).map(|()| previous),
                Err(e) => Err(e),
            };
            match result {
                Ok(previous) => written.push((key, previous)),
                Err(e) => {
                    for (key, previous) in written.into_iter().rev() {
                        let restored = match previous {
                            Some(old) => self.set(key, &old),
                            None => self.remove(key),
                        };
                        if let Err(undo) = restored {
                            log::error!("Could not roll back '{}': {}", key, undo);
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

/// Shared handle so several owners (cooldown, favorites, settings) can use
/// one backing store on a single-threaded host.
#[derive(Debug, Default)]
pub struct SharedStore<S> {
    inner: Rc<RefCell<S>>,
}

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
        }
    }

    /// Run a closure against the underlying store
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow())
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> KeyValueStore for SharedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().remove(key)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        self.inner.borrow_mut().set_many(entries)
    }
}

/// Read and decode a JSON value. Missing, unreadable or malformed data all
/// come back as `None`; only the latter two are logged.
pub fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed data under '{}': {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Could not read '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: serde::Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_store_sees_writes_from_clones() {
        let shared = SharedStore::new(MemoryStore::new());
        let mut writer = shared.clone();
        writer.set("a", "1").unwrap();
        assert_eq!(shared.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(shared.with(|s| s.len()), 1);
    }

    #[test]
    fn test_load_json_malformed_is_none() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert_eq!(load_json::<Vec<u32>, _>(&store, "k"), None);
        assert_eq!(load_json::<Vec<u32>, _>(&store, "missing"), None);

        save_json(&mut store, "k", &vec![1u32, 2]).unwrap();
        assert_eq!(load_json::<Vec<u32>, _>(&store, "k"), Some(vec![1, 2]));
    }

    /// Rejects writes to one key
    struct RejectingStore {
        inner: MemoryStore,
        reject: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.reject {
                return Err(StoreError::Unavailable("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_set_many_rolls_back_on_failure() {
        let mut store = RejectingStore {
            inner: MemoryStore::new(),
            reject: "c",
        };
        store.inner.set("a", "old").unwrap();

        let result = store.set_many(&[
            ("a", "new".to_string()),
            ("b", "new".to_string()),
            ("c", "new".to_string()),
        ]);
        assert!(result.is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("old"));
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("c").unwrap(), None);

        store.set_many(&[("a", "1".to_string()), ("b", "2".to_string())]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// All keys in one JSON object on disk
///
/// Every write rewrites the file through a `.tmp` sibling and a rename, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) a store at `path`
    ///
    /// A missing file opens empty. A malformed file also opens empty and is
    /// replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Store file {} is malformed ({}), starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.apply(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        self.apply(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.clone());
            }
        })
    }
}

impl JsonFileStore {
    /// Mutate the in-memory map and flush; a failed flush restores the map so
    /// memory never runs ahead of disk.
    fn apply(&mut self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let snapshot = self.entries.clone();
        change(&mut self.entries);
        if let Err(e) = self.flush() {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("catch_stars_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .set_many(&[("lastPlayTimestamp", "42".to_string()), ("x", "y".to_string())])
            .unwrap();
        store.remove("x").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("lastPlayTimestamp").unwrap().as_deref(), Some("42"));
        assert_eq!(reopened.get("x").unwrap(), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_flush_leaves_no_phantom_entries() {
        let path = std::env::temp_dir()
            .join(format!("catch_stars_missing_dir_{}", std::process::id()))
            .join("save.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.set("lastPlayTimestamp", "42").is_err());
        assert_eq!(store.get("lastPlayTimestamp").unwrap(), None);

        assert!(store
            .set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .is_err());
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_malformed_file_opens_empty() {
        let path = temp_path("malformed");
        fs::write(&path, "[[[").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);

        let _ = fs::remove_file(&path);
    }
}

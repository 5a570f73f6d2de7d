//! JSON-file-backed store.

use crate::{KeyValueStore, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Disk-backed store holding every entry in one JSON object file.
///
/// Reads are served from a write-through cache; each mutation rewrites the
/// whole file. Suited to the handful of small values the SDK persists, not
/// to large data sets.
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing contents if the file is present.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), entries = cache.len(), "Opened file store");
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, cache: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(cache)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut cache = self.cache();
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.cache().get(key).cloned())
    }

    fn set_many(&self, entries: &[(String, String)]) -> StorageResult<()> {
        let mut cache = self.cache();
        for (key, value) in entries {
            cache.insert(key.clone(), value.clone());
        }
        self.persist(&cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.json");

        let store = FileStore::open(&path).unwrap();
        store.set("install_time", "2026-08-21 09:15:00").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("install_time").unwrap(),
            Some("2026-08-21 09:15:00".to_string())
        );
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.has("anything").unwrap());
    }

    #[test]
    fn test_file_store_set_many_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.json");

        let store = FileStore::open(&path).unwrap();
        store
            .set_many(&[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
            .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(reopened.get("b").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beacon.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dirs/beacon.json");

        let store = FileStore::open(&path).unwrap();
        store.set("key", "value").unwrap();

        assert!(path.exists());
    }
}

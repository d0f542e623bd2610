use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::{KeyValueStore, StoreError};

/// Store persisted as one JSON object of `key -> raw value` on disk.
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename, so readers never observe a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt(err.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(entries)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Current entries for a mutation. A corrupt file is discarded.
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_entries() {
            Err(StoreError::Corrupt(detail)) => {
                warn!(path = %self.path.display(), %detail, "discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.locked()?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.locked()?;
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.locked()?;
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("store.json"));
        assert_eq!(store.get("anything").expect("read succeeds"), None);
    }

    #[test]
    fn values_survive_a_new_handle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");

        JsonFileStore::new(&path)
            .set("greeting", "\"hello\"".to_string())
            .expect("write succeeds");

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("greeting").expect("read succeeds").as_deref(),
            Some("\"hello\"")
        );
    }

    #[test]
    fn corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "[[[").expect("seed corrupt file");
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.get("key"), Err(StoreError::Corrupt(_))));

        store.set("key", "1".to_string()).expect("write recovers");
        assert_eq!(store.get("key").expect("read succeeds").as_deref(), Some("1"));
    }

    #[test]
    fn remove_drops_only_the_named_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("store.json"));
        store.set("a", "1".to_string()).expect("write a");
        store.set("b", "2".to_string()).expect("write b");

        store.remove("a").expect("remove a");

        assert_eq!(store.get("a").expect("read a"), None);
        assert_eq!(store.get("b").expect("read b").as_deref(), Some("2"));
    }
}

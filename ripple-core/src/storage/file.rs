//! File-backed store.

use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::debug;

use super::{KeyMap, KeyValueStore, StorageError};

/// A durable key-value store holding the whole keyed namespace as one JSON
/// object in a single file.
///
/// The file is loaded leniently at open: a missing or unparsable file
/// yields an empty namespace rather than an error. Every write rewrites
/// the file; a write failure leaves the in-memory entries intact, so
/// subsequent reads in the same process still see the latest values.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<KeyMap>,
}

impl FileStore {
    /// Open the store at `path`, loading any existing entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<KeyMap>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    debug!(path = %path.display(), %err, "discarding unparsable store file");
                    KeyMap::new()
                }
            },
            Err(_) => KeyMap::new(),
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let serialized = {
            let entries = self.entries.read();
            serde_json::to_string(&*entries)?
        };
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn scratch_path(name: &str) -> PathBuf {
        static UNIQUE: AtomicU64 = AtomicU64::new(0);
        let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "ripple-store-{name}-{}-{n}.json",
            std::process::id()
        ))
    }

    #[test]
    fn entries_survive_reopen() {
        let path = scratch_path("reopen");

        {
            let store = FileStore::open(&path);
            store.set("theme", "\"dark\"").unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("theme").unwrap(), Some("\"dark\"".to_owned()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let path = scratch_path("missing");
        let store = FileStore::open(&path);
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn corrupt_file_yields_empty_store() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("k").unwrap(), None);

        // the store is still writable afterwards
        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("1".to_owned()));

        let _ = fs::remove_file(&path);
    }
}

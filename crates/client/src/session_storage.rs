use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::{ClientError, ClientResult};

/// Key-value storage backing the client session record.
pub trait SessionStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Process-local storage that disappears with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Storage that keeps one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    directory: PathBuf,
}

impl FileSessionStorage {
    /// Creates storage rooted at `directory`. The directory is created on first write.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ClientError::Storage(format!(
                "failed to read session '{key}': {error}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        std::fs::create_dir_all(&self.directory).map_err(|error| {
            ClientError::Storage(format!("failed to create session directory: {error}"))
        })?;

        std::fs::write(self.path_for(key), value).map_err(|error| {
            ClientError::Storage(format!("failed to write session '{key}': {error}"))
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ClientError::Storage(format!(
                "failed to remove session '{key}': {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FileSessionStorage, MemorySessionStorage, SessionStorage};

    fn exercise(storage: &dyn SessionStorage) {
        assert_eq!(storage.get("auth-storage").ok(), Some(None));
        assert!(storage.set("auth-storage", "{}").is_ok());
        assert_eq!(
            storage.get("auth-storage").ok().flatten().as_deref(),
            Some("{}")
        );
        assert!(storage.remove("auth-storage").is_ok());
        assert!(storage.remove("auth-storage").is_ok());
        assert_eq!(storage.get("auth-storage").ok(), Some(None));
    }

    #[test]
    fn memory_storage_round_trips_values() {
        exercise(&MemorySessionStorage::new());
    }

    #[test]
    fn file_storage_round_trips_values() {
        let directory = std::env::temp_dir().join(format!(
            "taskpro-session-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        exercise(&FileSessionStorage::new(&directory));
        let _ = std::fs::remove_dir_all(directory);
    }
}

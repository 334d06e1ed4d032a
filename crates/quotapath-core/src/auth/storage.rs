//! Durable key-value storage for the persisted session.
//!
//! The session is kept under two keys, [`AUTH_TOKEN_KEY`] and [`USER_KEY`].
//! Backends only deal in strings; callers own the serialization.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use keyring::Entry;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Key holding the opaque auth token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Keychain service name for [`KeyringStorage`]
const SERVICE_NAME: &str = "quotapath";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// All keys in one pretty-printed JSON object on disk.
pub struct FileStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let path = self.path();
        if entries.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        // A corrupt file is replaced rather than blocking new writes
        let mut entries = self.read_all().unwrap_or_else(|e| {
            debug!(error = %e, "Discarding unreadable session file");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Json(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.remove(key);
        self.write_all(&entries)
    }
}

/// One OS keychain entry per key.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.entry(key)?.set_password(value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("quotapath-{}-{}-{}", name, std::process::id(), nanos))
    }

    #[test]
    fn test_file_storage_round_trip_and_cleanup() {
        let dir = scratch_dir("file");
        let storage = FileStorage::new(dir.clone());

        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);

        storage.set(AUTH_TOKEN_KEY, "abc123").unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).unwrap();
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
        assert!(storage.path().exists());

        // Survives a fresh handle on the same directory
        let reopened = FileStorage::new(dir.clone());
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":1}"#));

        storage.remove(AUTH_TOKEN_KEY).unwrap();
        assert!(storage.path().exists());
        storage.remove(USER_KEY).unwrap();
        assert!(!storage.path().exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let storage = FileStorage::new(dir.clone());
        std::fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(storage.get(AUTH_TOKEN_KEY), Err(StorageError::Json(_))));
        storage.remove(AUTH_TOKEN_KEY).unwrap();
        assert!(!storage.path().exists());

        std::fs::write(storage.path(), "not json").unwrap();
        storage.set(AUTH_TOKEN_KEY, "fresh").unwrap();
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(USER_KEY, "{}").unwrap();
        assert_eq!(storage.len(), 1);
        storage.remove(USER_KEY).unwrap();
        storage.remove(USER_KEY).unwrap();
        assert!(storage.is_empty());
    }
}

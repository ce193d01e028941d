//! Key-value storage backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistent key-value storage capability (`get` / `set` / `remove`).
///
/// Implementations must be usable from several in-flight requests at once;
/// values are read fresh on every call and never cached by callers.
pub trait StorageProvider: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage backed by the `local_storage` table of the SQLite database.
#[derive(Clone)]
pub struct SqliteStorage {
    db: Arc<Mutex<Database>>,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> Result<T, rusqlite::Error>,
    ) -> Result<T, StorageError> {
        let guard = self
            .db
            .lock()
            .map_err(|_| StorageError::Unavailable("database lock poisoned".to_string()))?;
        Ok(f(&guard)?)
    }
}

impl StorageProvider for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_db(|db| db.get_item(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_db(|db| db.set_item(key, value))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_db(|db| db.remove_item(key))
    }
}

/// Volatile storage; contents are lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with the given entries.
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            items: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }
}

impl StorageProvider for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_get_set_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get("token").unwrap().is_none());

        storage.set("token", "abc.def").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("abc.def".to_string()));

        storage.remove("token").unwrap();
        assert!(storage.get("token").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let storage = MemoryStorage::with_items([("refresh", "r1")]);
        let other = storage.clone();
        other.set("refresh", "r2").unwrap();
        assert_eq!(storage.get("refresh").unwrap(), Some("r2".to_string()));
    }

    #[test]
    fn test_sqlite_storage_roundtrip() {
        let storage = SqliteStorage::new(Database::open_in_memory().unwrap());

        storage.set("access", "a.b.c").unwrap();
        assert_eq!(storage.get("access").unwrap(), Some("a.b.c".to_string()));

        storage.remove("access").unwrap();
        assert!(storage.get("access").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_storage_reports_missing_table() {
        let db = Database::open_in_memory().unwrap();
        db.conn().execute_batch("DROP TABLE local_storage;").unwrap();
        let storage = SqliteStorage::new(db);

        assert!(matches!(
            storage.get("token"),
            Err(StorageError::Database(_))
        ));
    }
}

//! Token persistence on top of a [`StorageProvider`].
//!
//! Every read and write here is infallible from the caller's point of view:
//! storage failures are logged and treated as an absent value.

use std::sync::Arc;

use tracing::warn;

use super::provider::StorageProvider;

/// Current access token (primary key).
pub const KEY_TOKEN: &str = "token";
/// Current access token (alias accepted on read, written alongside `token`).
pub const KEY_ACCESS: &str = "access";
/// Refresh token.
pub const KEY_REFRESH: &str = "refresh";

/// Read an item, mapping storage errors and empty values to `None`.
pub fn read_item(storage: &dyn StorageProvider, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(Some(value)) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(e) => {
            warn!(key, error = %e, "Storage read failed, treating as absent");
            None
        }
    }
}

/// Write an item. Returns `false` if the write failed.
pub fn write_item(storage: &dyn StorageProvider, key: &str, value: &str) -> bool {
    match storage.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Storage write failed");
            false
        }
    }
}

/// Remove an item. Returns `false` if the removal failed.
pub fn remove_item(storage: &dyn StorageProvider, key: &str) -> bool {
    match storage.remove(key) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Storage remove failed");
            false
        }
    }
}

/// Access/refresh token store.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn StorageProvider>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// The underlying storage provider.
    pub fn storage(&self) -> &Arc<dyn StorageProvider> {
        &self.storage
    }

    /// Current access token, from `token` or else `access`.
    pub fn access_token(&self) -> Option<String> {
        read_item(self.storage.as_ref(), KEY_TOKEN)
            .or_else(|| read_item(self.storage.as_ref(), KEY_ACCESS))
    }

    pub fn refresh_token(&self) -> Option<String> {
        read_item(self.storage.as_ref(), KEY_REFRESH)
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist a new access token under both aliases. Empty tokens are ignored.
    pub fn store_access_token(&self, access: &str) {
        if access.is_empty() {
            return;
        }
        write_item(self.storage.as_ref(), KEY_TOKEN, access);
        write_item(self.storage.as_ref(), KEY_ACCESS, access);
    }

    pub fn store_refresh_token(&self, refresh: &str) {
        if refresh.is_empty() {
            return;
        }
        write_item(self.storage.as_ref(), KEY_REFRESH, refresh);
    }

    /// Persist a token pair; a missing refresh token keeps the stored one.
    pub fn store_session(&self, access: &str, refresh: Option<&str>) {
        self.store_access_token(access);
        if let Some(refresh) = refresh {
            self.store_refresh_token(refresh);
        }
    }

    /// Remove all tokens (sign out).
    pub fn clear(&self) {
        for key in [KEY_TOKEN, KEY_ACCESS, KEY_REFRESH] {
            remove_item(self.storage.as_ref(), key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    struct BrokenStorage;

    impl StorageProvider for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("denied".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("denied".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("denied".to_string()))
        }
    }

    #[test]
    fn test_access_token_prefers_token_key() {
        let store = TokenStore::new(Arc::new(MemoryStorage::with_items([
            ("token", "t.1"),
            ("access", "a.1"),
        ])));
        assert_eq!(store.access_token(), Some("t.1".to_string()));
    }

    #[test]
    fn test_access_token_falls_back_to_access_key() {
        let store = TokenStore::new(Arc::new(MemoryStorage::with_items([
            ("token", ""),
            ("access", "a.1"),
        ])));
        assert_eq!(store.access_token(), Some("a.1".to_string()));
    }

    #[test]
    fn test_store_access_token_writes_both_aliases() {
        let storage = MemoryStorage::new();
        let store = TokenStore::new(Arc::new(storage.clone()));

        store.store_access_token("new.token");

        assert_eq!(storage.get("token").unwrap(), Some("new.token".to_string()));
        assert_eq!(storage.get("access").unwrap(), Some("new.token".to_string()));
    }

    #[test]
    fn test_store_session_keeps_refresh_when_absent() {
        let storage = MemoryStorage::with_items([("refresh", "old")]);
        let store = TokenStore::new(Arc::new(storage));

        store.store_session("x.y", None);
        assert_eq!(store.refresh_token(), Some("old".to_string()));

        store.store_session("x.z", Some("new"));
        assert_eq!(store.refresh_token(), Some("new".to_string()));
    }

    #[test]
    fn test_clear_removes_all_tokens() {
        let store = TokenStore::new(Arc::new(MemoryStorage::with_items([
            ("token", "t.1"),
            ("access", "a.1"),
            ("refresh", "r"),
        ])));

        store.clear();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_broken_storage_is_tolerated() {
        let store = TokenStore::new(Arc::new(BrokenStorage));

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        store.store_session("a.b", Some("r"));
        store.clear();
    }
}

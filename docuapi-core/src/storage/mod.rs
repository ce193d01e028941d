//! Client-side persistent key-value storage.
//!
//! This module provides:
//! - The [`StorageProvider`] capability with SQLite and in-memory backends
//! - Failure-tolerant token persistence ([`TokenStore`])

mod provider;
mod tokens;

pub use provider::{MemoryStorage, SqliteStorage, StorageError, StorageProvider};
pub use tokens::{
    read_item, remove_item, write_item, TokenStore, KEY_ACCESS, KEY_REFRESH, KEY_TOKEN,
};

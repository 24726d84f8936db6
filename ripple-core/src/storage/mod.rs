//! Key-value storage backends for persistent signals.
//!
//! Storage is a single keyed namespace of UTF-8 JSON strings. There is no
//! schema versioning and no migration path: callers that find a value they
//! cannot parse discard it in favor of their default. Concurrent writers
//! to the same key are not coordinated; last write wins.

use std::collections::HashMap;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
///
/// Persistent signals swallow these; they surface only to callers using a
/// backend directly.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),

    /// The stored payload could not be encoded or decoded.
    #[error("storage encoding failure: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub(crate) type KeyMap = HashMap<String, String>;

//! Remote key-value store capability and implementations.
//!
//! Provides the minimal store interface the namespaced storage layer is
//! built on, with an in-memory implementation for testing and a Redis-based
//! implementation for networked deployments.

pub mod memory;
pub mod redis_store;

use thiserror::Error;

/// Errors that can occur in KV store operations.
#[derive(Error, Debug)]
pub enum KVError {
    #[error("kv: connection error: {0}")]
    Connection(String),

    #[error("kv: storage error: {0}")]
    Storage(String),
}

/// Result type for KV operations.
pub type KVResult<T> = Result<T, KVError>;

/// Key-value store trait.
///
/// String keys, byte values. Implementations only need per-key atomicity;
/// nothing here spans more than one key.
pub trait KVStore: Send + Sync {
    /// Get a value by key. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>>;

    /// Set a key-value pair, overwriting any existing value.
    fn set(&self, key: &str, value: &[u8]) -> KVResult<()>;

    /// Delete a key. Returns `true` if an entry was actually removed.
    fn delete(&self, key: &str) -> KVResult<bool>;

    /// List every key starting with `prefix`.
    ///
    /// Equivalent to a `prefix*` pattern scan. Order is unspecified and
    /// scan-based backends may report a key more than once.
    fn keys(&self, prefix: &str) -> KVResult<Vec<String>>;
}

// Re-export the implementations
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

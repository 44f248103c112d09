//! Namespaced key-value storage over a remote store.
//!
//! Each [`NamespacedStore`] owns one namespace of a shared [`KVStore`].
//! Logical keys are mapped to physical keys of the form
//! `nskv:{namespace}:{key}`, values go through a [`Codec`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use nskv_kv::MemoryStore;
//! use nskv_storage::{NamespacedStore, Storage};
//!
//! let store = NamespacedStore::new(Arc::new(MemoryStore::new()), "plugins").unwrap();
//! store.set("alpha", &serde_json::json!({"x": 1})).unwrap();
//!
//! let v: serde_json::Value = store.get("alpha").unwrap();
//! assert_eq!(v["x"], 1);
//! assert_eq!(store.len().unwrap(), 1);
//! ```
//!
//! For a networked deployment, build a [`RedisPlugin`] from a
//! [`StorageConfig`] and [`open`](StoragePlugin::open) one store per
//! namespace.

pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod plugin;
pub mod store;

use std::collections::BTreeSet;

use serde::{de::DeserializeOwned, Serialize};

pub use codec::{AnyCodec, Codec, CodecError, JsonCodec, MsgPackCodec};
pub use config::{RedisConfig, StorageConfig};
pub use error::{Result, StorageError};
pub use keys::LogicalKey;
pub use nskv_kv::{KVError, KVStore, MemoryStore, RedisStore};
pub use plugin::{MemoryPlugin, RedisPlugin, StoragePlugin};
pub use store::NamespacedStore;

/// Storage interface consumed by the host application.
///
/// One instance serves one namespace. Values are any serde type the
/// backing codec can round-trip.
pub trait Storage {
    /// The namespace this storage is scoped to.
    fn namespace(&self) -> &str;

    /// Fetch and decode the value at `key`.
    ///
    /// Fails with [`StorageError::NotFound`] if there is no entry and
    /// [`StorageError::CorruptValue`] if the stored bytes do not decode.
    fn get<T, K>(&self, key: &K) -> Result<T>
    where
        T: DeserializeOwned,
        K: LogicalKey + ?Sized;

    /// Encode and store `value` at `key`, replacing any previous value.
    fn set<T, K>(&self, key: &K, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
        K: LogicalKey + ?Sized;

    /// Delete the entry at `key`. Fails with [`StorageError::NotFound`] if
    /// nothing was there.
    fn remove<K>(&self, key: &K) -> Result<()>
    where
        K: LogicalKey + ?Sized;

    /// All logical keys currently in the namespace.
    fn keys(&self) -> Result<BTreeSet<String>>;

    /// Number of entries in the namespace, i.e. `keys()?.len()`.
    fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    /// True when the namespace holds no entries. Same snapshot caveat as
    /// [`len`](Storage::len).
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Release resources held by this storage. The shared connection is
    /// left open.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

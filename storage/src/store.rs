use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use nskv_kv::KVStore;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};

use crate::codec::{Codec, JsonCodec};
use crate::error::{Result, StorageError};
use crate::keys::{namespace_prefix, physical_key, strip_namespace, validate_namespace, LogicalKey};
use crate::Storage;

/// Storage for a single namespace on a shared KV store.
///
/// Holds no mutable state: every call goes straight to the store, which
/// is the only source of truth. Several instances, even in different
/// processes, can serve the same namespace.
pub struct NamespacedStore<C = JsonCodec> {
    store: Arc<dyn KVStore>,
    namespace: String,
    prefix: String,
    codec: C,
}

impl NamespacedStore<JsonCodec> {
    /// Create a store for `namespace` using the JSON codec.
    ///
    /// Fails with [`StorageError::Config`] if the namespace contains the
    /// key separator.
    pub fn new(store: Arc<dyn KVStore>, namespace: impl Into<String>) -> Result<Self> {
        Self::with_codec(store, namespace, JsonCodec)
    }
}

impl<C: Codec> NamespacedStore<C> {
    /// Create a store for `namespace` using `codec`.
    pub fn with_codec(
        store: Arc<dyn KVStore>,
        namespace: impl Into<String>,
        codec: C,
    ) -> Result<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        let prefix = namespace_prefix(&namespace);
        Ok(Self {
            store,
            namespace,
            prefix,
            codec,
        })
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Physical key for a logical key.
    pub fn physical_key<K: LogicalKey + ?Sized>(&self, key: &K) -> String {
        physical_key(&self.namespace, &key.to_key())
    }

    /// Whether an entry exists at `key`. The value is not decoded.
    pub fn contains<K: LogicalKey + ?Sized>(&self, key: &K) -> Result<bool> {
        let unique_key = self.physical_key(key);
        Ok(self.store.get(&unique_key)?.is_some())
    }
}

impl<C: Codec> Storage for NamespacedStore<C> {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get<T, K>(&self, key: &K) -> Result<T>
    where
        T: DeserializeOwned,
        K: LogicalKey + ?Sized,
    {
        let unique_key = self.physical_key(key);
        debug!("Get key: {}", unique_key);

        let data = match self.store.get(&unique_key)? {
            Some(data) => data,
            None => return Err(StorageError::NotFound { key: unique_key }),
        };

        self.codec
            .decode(&data)
            .map_err(|e| StorageError::CorruptValue {
                key: unique_key,
                reason: e.to_string(),
            })
    }

    fn set<T, K>(&self, key: &K, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
        K: LogicalKey + ?Sized,
    {
        let unique_key = self.physical_key(key);
        let data = self.codec.encode(value)?;
        debug!(
            "Setting {} bytes ({}) at '{}'",
            data.len(),
            self.codec.name(),
            unique_key
        );
        self.store.set(&unique_key, &data)?;
        Ok(())
    }

    fn remove<K>(&self, key: &K) -> Result<()>
    where
        K: LogicalKey + ?Sized,
    {
        let unique_key = self.physical_key(key);
        debug!("Removing value at '{}'", unique_key);
        if !self.store.delete(&unique_key)? {
            return Err(StorageError::NotFound { key: unique_key });
        }
        Ok(())
    }

    fn keys(&self) -> Result<BTreeSet<String>> {
        let physical = self.store.keys(&self.prefix)?;
        let mut keys = BTreeSet::new();
        for key in &physical {
            match strip_namespace(&self.prefix, key) {
                Some(logical) => {
                    keys.insert(logical.to_string());
                }
                None => trace!("Skipping foreign key: {}", key),
            }
        }
        trace!("Keys in '{}': {:?}", self.namespace, keys);
        Ok(keys)
    }

    fn close(self) -> Result<()> {
        debug!("Closing storage for namespace '{}'", self.namespace);
        Ok(())
    }
}

impl<C: Codec + fmt::Debug> fmt::Debug for NamespacedStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedStore")
            .field("namespace", &self.namespace)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

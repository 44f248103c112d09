//! In-memory key-value store implementation for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{KVError, KVResult, KVStore};

/// An in-memory key-value store backed by a HashMap.
///
/// Clones share the same underlying data, so one store can back several
/// namespaces the way a single Redis database would.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all namespaces.
    pub fn total_len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let data = self
            .data
            .read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> KVResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> KVResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(data.remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> KVResult<Vec<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let mut keys: Vec<String> = data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

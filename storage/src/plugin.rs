//! Storage plugins: factories that open one [`NamespacedStore`] per
//! namespace.

use std::sync::Arc;

use nskv_kv::{KVStore, MemoryStore, RedisStore};
use redis::Client;
use tracing::debug;

use crate::codec::{AnyCodec, Codec};
use crate::config::{RedisConfig, StorageConfig};
use crate::error::{Result, StorageError};
use crate::keys::validate_namespace;
use crate::store::NamespacedStore;
use crate::Storage;

/// Opens storage for a namespace.
pub trait StoragePlugin {
    type Store: Storage;

    fn open(&self, namespace: &str) -> Result<Self::Store>;
}

/// Redis-backed storage plugin.
///
/// Configuration is checked when the plugin is created; connecting is
/// deferred to [`open`](StoragePlugin::open), which opens a fresh
/// connection per namespace.
#[derive(Debug, Clone)]
pub struct RedisPlugin {
    client: Client,
    codec: AnyCodec,
}

impl RedisPlugin {
    /// Create a plugin from a storage config. Requires `server`, `port`,
    /// `db` and `password`; fails before any connection attempt if one is
    /// missing or malformed.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let redis = RedisConfig::from_storage_config(config)?;
        let codec = config.codec()?;
        let client = Client::open(redis.connection_info())
            .map_err(|e| StorageError::Config(e.to_string()))?;
        Ok(Self { client, codec })
    }

    /// Create a plugin from a connection URL, passed through to the redis
    /// client as-is.
    pub fn from_url(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(|e| StorageError::Config(e.to_string()))?;
        Ok(Self {
            client,
            codec: AnyCodec::default(),
        })
    }

    /// Replace the codec used by stores opened afterwards.
    pub fn with_codec(mut self, codec: AnyCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn codec(&self) -> AnyCodec {
        self.codec
    }

    /// Open `namespace` with an explicit codec.
    pub fn open_with_codec<C: Codec>(&self, namespace: &str, codec: C) -> Result<NamespacedStore<C>> {
        // Reject bad namespaces before paying for a connection.
        validate_namespace(namespace)?;
        let store = self.connect()?;
        NamespacedStore::with_codec(store, namespace, codec)
    }

    fn connect(&self) -> Result<Arc<dyn KVStore>> {
        let store = RedisStore::from_client(&self.client)?;
        Ok(Arc::new(store))
    }
}

impl StoragePlugin for RedisPlugin {
    type Store = NamespacedStore<AnyCodec>;

    fn open(&self, namespace: &str) -> Result<Self::Store> {
        debug!("Opening redis storage for namespace '{}'", namespace);
        self.open_with_codec(namespace, self.codec)
    }
}

/// In-memory storage plugin for tests and development.
///
/// Every namespace opened from one plugin (or its clones) shares the same
/// backing [`MemoryStore`].
#[derive(Clone, Default)]
pub struct MemoryPlugin {
    store: MemoryStore,
    codec: AnyCodec,
}

impl MemoryPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(mut self, codec: AnyCodec) -> Self {
        self.codec = codec;
        self
    }

    /// The shared backing store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl StoragePlugin for MemoryPlugin {
    type Store = NamespacedStore<AnyCodec>;

    fn open(&self, namespace: &str) -> Result<Self::Store> {
        debug!("Opening memory storage for namespace '{}'", namespace);
        NamespacedStore::with_codec(Arc::new(self.store.clone()), namespace, self.codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DB, PASSWORD, PORT, SERVER};
    use serde_json::Value;

    fn redis_config() -> StorageConfig {
        StorageConfig::new()
            .with(SERVER, "127.0.0.1")
            .with(PORT, 6379)
            .with(DB, 0)
            .with(PASSWORD, Value::Null)
    }

    #[test]
    fn test_redis_plugin_validates_without_connecting() {
        // Port 1 has nothing listening; construction must still succeed
        // because no connection is made yet.
        let plugin = RedisPlugin::new(&redis_config().with(PORT, 1)).unwrap();
        assert_eq!(plugin.codec(), AnyCodec::Json);
    }

    #[test]
    fn test_redis_plugin_rejects_incomplete_config() {
        let err = RedisPlugin::new(&StorageConfig::new().with(SERVER, "x")).unwrap_err();
        assert!(matches!(err, StorageError::Config(_)));
    }

    #[test]
    fn test_redis_plugin_codec_from_config() {
        let plugin = RedisPlugin::new(&redis_config().with("codec", "msgpack")).unwrap();
        assert_eq!(plugin.codec(), AnyCodec::MsgPack);
    }

    #[test]
    fn test_redis_plugin_from_url() {
        assert!(RedisPlugin::from_url("redis://localhost:6379/1").is_ok());
        assert!(matches!(
            RedisPlugin::from_url("definitely not a url"),
            Err(StorageError::Config(_))
        ));
    }

    #[test]
    fn test_redis_plugin_open_unreachable_is_kv_error() {
        let plugin = RedisPlugin::new(&redis_config().with(PORT, 1)).unwrap();
        let err = plugin.open("ns").unwrap_err();
        assert!(matches!(err, StorageError::KV(_)), "{err:?}");
    }

    #[test]
    fn test_redis_plugin_rejects_namespace_before_connecting() {
        // Nothing listens on port 1, so a KV error here would mean the
        // plugin tried to connect first.
        let plugin = RedisPlugin::new(&redis_config().with(PORT, 1)).unwrap();
        let err = plugin.open("a:b").unwrap_err();
        assert!(matches!(err, StorageError::Config(_)), "{err:?}");
    }

    #[test]
    fn test_memory_plugin_shares_store() {
        let plugin = MemoryPlugin::new();
        let a = plugin.open("a").unwrap();
        let b = plugin.open("b").unwrap();
        a.set("k", &1).unwrap();
        b.set("k", &2).unwrap();
        assert_eq!(plugin.store().total_len(), 2);
        assert_eq!(a.namespace(), "a");
    }

    #[test]
    fn test_memory_plugin_codec() {
        let plugin = MemoryPlugin::new().with_codec(AnyCodec::MsgPack);
        let s = plugin.open("ns").unwrap();
        assert_eq!(s.codec().name(), "msgpack");
        s.set("k", &vec![1u8, 2, 3]).unwrap();
        let back: Vec<u8> = s.get("k").unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    /// Requires a running Redis. Set NSKV_TEST_REDIS_URL and run with
    /// `--ignored`.
    #[test]
    #[ignore]
    fn test_redis_plugin_roundtrip() {
        let url = std::env::var("NSKV_TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string());
        let plugin = RedisPlugin::from_url(&url).unwrap();
        let store = plugin.open("nskv-plugin-test").unwrap();

        for k in store.keys().unwrap() {
            store.remove(&k).unwrap();
        }

        store.set("alpha", &serde_json::json!({"x": 1})).unwrap();
        store.set("a:b*c", &"glob").unwrap();
        let v: serde_json::Value = store.get("alpha").unwrap();
        assert_eq!(v, serde_json::json!({"x": 1}));
        assert_eq!(store.len().unwrap(), 2);

        store.remove("alpha").unwrap();
        store.remove("a:b*c").unwrap();
        assert!(store.get::<serde_json::Value, _>("alpha").unwrap_err().is_not_found());
        assert!(store.is_empty().unwrap());
    }
}

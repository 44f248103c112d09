//! Storage configuration.
//!
//! The configuration is a free-form string-keyed map, as supplied by the
//! host (for example a `storage:` section of its config file). Backends
//! pick the keys they need out of it.
//!
//! ```yaml
//! server: 127.0.0.1
//! port: 6379
//! db: 0
//! password: null
//! codec: msgpack   # optional, defaults to json
//! ```

use std::path::Path;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::AnyCodec;
use crate::error::{Result, StorageError};

pub const SERVER: &str = "server";
pub const PORT: &str = "port";
pub const DB: &str = "db";
pub const PASSWORD: &str = "password";
pub const CODEC: &str = "codec";

/// Keys a Redis configuration must define. `password` may be null.
pub const REQUIRED_KEYS: [&str; 4] = [SERVER, PORT, DB, PASSWORD];

/// Raw storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageConfig(Map<String, Value>);

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Parse from a YAML document. JSON is valid YAML, so this accepts both.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Load from a file, choosing JSON or YAML by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageError::Config(format!("read {}: {}", path.display(), e)))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("yaml");

        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&content)
                .map_err(|e| StorageError::Config(format!("{}: {}", path.display(), e))),
            _ => serde_yaml::from_str(&content)
                .map_err(|e| StorageError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    /// Codec selected by the optional `codec` key.
    pub fn codec(&self) -> Result<AnyCodec> {
        match self.0.get(CODEC) {
            None | Some(Value::Null) => Ok(AnyCodec::default()),
            Some(Value::String(name)) => AnyCodec::from_name(name)
                .ok_or_else(|| StorageError::Config(format!("unknown codec {name:?}"))),
            Some(other) => Err(StorageError::Config(format!(
                "{CODEC} must be a string, got {other}"
            ))),
        }
    }

    /// Required keys that are absent.
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|k| !self.0.contains_key(**k))
            .map(|k| k.to_string())
            .collect()
    }
}

impl From<Map<String, Value>> for StorageConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Validated Redis connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    pub server: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<String>,
}

impl RedisConfig {
    /// Extract and check the Redis settings. Every missing key is reported
    /// in one error; nothing is connected.
    pub fn from_storage_config(config: &StorageConfig) -> Result<Self> {
        let missing = config.missing(&REQUIRED_KEYS);
        if !missing.is_empty() {
            return Err(StorageError::Config(format!(
                "you need to specify: {} in the storage config (missing: {})",
                REQUIRED_KEYS.join(", "),
                missing.join(", ")
            )));
        }

        let mut fields = Map::new();
        for key in REQUIRED_KEYS {
            if let Some(v) = config.get(key) {
                fields.insert(key.to_string(), v.clone());
            }
        }

        let mut cfg: RedisConfig = serde_json::from_value(Value::Object(fields))
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if cfg.server.is_empty() {
            return Err(StorageError::Config(format!("{SERVER} must not be empty")));
        }
        if cfg.password.as_deref() == Some("") {
            cfg.password = None;
        }
        Ok(cfg)
    }

    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.server.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

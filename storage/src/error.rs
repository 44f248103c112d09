use thiserror::Error;

use crate::codec::CodecError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage: invalid config: {0}")]
    Config(String),

    #[error("storage: {key} does not exist")]
    NotFound { key: String },

    #[error("storage: corrupt value at {key}: {reason}")]
    CorruptValue { key: String, reason: String },

    #[error("storage: codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("storage: kv error: {0}")]
    KV(#[from] nskv_kv::KVError),
}

impl StorageError {
    /// True for [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

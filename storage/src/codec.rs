//! Value codecs.
//!
//! A codec turns any serde-serializable value into bytes and back. The
//! namespaced store is generic over the codec, so anything the codec can
//! round-trip can be stored.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors produced while encoding or decoding a value.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("msgpack encode: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("msgpack decode: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

/// Converts structured values to and from stored bytes.
///
/// `decode(encode(v)) == v` must hold for every value a caller stores.
pub trait Codec: Send + Sync {
    /// Short name, as used in configuration.
    fn name(&self) -> &'static str;

    /// Serialize `value` into the bytes to store.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Parse stored bytes back into a value. Fails if the bytes were not
    /// produced by this codec or do not match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// JSON text encoding. The default codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// MessagePack encoding with named struct fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(rmp_serde::from_slice(data)?)
    }
}

/// A codec chosen at runtime, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnyCodec {
    #[default]
    Json,
    MsgPack,
}

impl AnyCodec {
    /// Look up a codec by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(AnyCodec::Json),
            "msgpack" => Some(AnyCodec::MsgPack),
            _ => None,
        }
    }
}

impl Codec for AnyCodec {
    fn name(&self) -> &'static str {
        match self {
            AnyCodec::Json => JsonCodec.name(),
            AnyCodec::MsgPack => MsgPackCodec.name(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            AnyCodec::Json => JsonCodec.encode(value),
            AnyCodec::MsgPack => MsgPackCodec.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        match self {
            AnyCodec::Json => JsonCodec.decode(data),
            AnyCodec::MsgPack => MsgPackCodec.decode(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Plugin {
        name: String,
        enabled: bool,
        tags: Vec<String>,
        limits: BTreeMap<String, u32>,
        note: Option<String>,
    }

    fn sample() -> Plugin {
        Plugin {
            name: "webhooks".into(),
            enabled: true,
            tags: vec!["http".into(), "core".into()],
            limits: BTreeMap::from([("rate".to_string(), 10)]),
            note: None,
        }
    }

    #[test]
    fn test_json_is_text() {
        let data = JsonCodec.encode(&serde_json::json!({"x": 1})).unwrap();
        assert_eq!(data, br#"{"x":1}"#);
    }

    #[test]
    fn test_structured_value_survives_each_codec() {
        for codec in [AnyCodec::Json, AnyCodec::MsgPack] {
            let data = codec.encode(&sample()).unwrap();
            let back: Plugin = codec.decode(&data).unwrap();
            assert_eq!(back, sample(), "codec {}", codec.name());
        }
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(JsonCodec.decode::<Plugin>(b"{not json").is_err());
        assert!(MsgPackCodec.decode::<Plugin>(&[0xc1]).is_err());
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let data = JsonCodec.encode(&[1, 2, 3]).unwrap();
        assert!(JsonCodec.decode::<Plugin>(&data).is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(AnyCodec::from_name("json"), Some(AnyCodec::Json));
        assert_eq!(AnyCodec::from_name("msgpack"), Some(AnyCodec::MsgPack));
        assert_eq!(AnyCodec::from_name("pickle"), None);
        assert_eq!(AnyCodec::default().name(), "json");
    }
}

//! Codec Module
//!
//! Encodes element bodies and chunk records into the strings held by a store.

use serde_json::Value;

use crate::error::Result;

// == Codec ==
/// Pluggable payload serialization.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String>;
    fn decode(&self, raw: &str) -> Result<Value>;
}

// == JSON Codec ==
/// Compact JSON text. Object key order is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, raw: &str) -> Result<Value> {
        Ok(serde_json::from_str(raw)?)
    }
}

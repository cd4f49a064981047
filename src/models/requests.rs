//! Request DTOs for the list cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Request body for creating a list (POST /lists)
///
/// # Fields
/// - `elements`: Element bodies, in order
/// - `options`: Raw create options, validated by the client
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListRequest {
    pub elements: Vec<Value>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Request body for appending an element (POST /lists/:id/elements)
#[derive(Debug, Clone, Deserialize)]
pub struct PushElementRequest {
    /// Element id; generated when absent
    #[serde(default)]
    pub uuid: Option<String>,
    pub body: Value,
}

/// Request body for changing a list TTL (PUT /lists/:id/ttl)
///
/// A missing or null `ttl` makes the list permanent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTtlRequest {
    #[serde(default)]
    pub ttl: Option<u64>,
}

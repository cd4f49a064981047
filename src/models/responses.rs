//! Response DTOs for the list cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::Headers;

/// Response body carrying a whole list (POST /lists, GET /lists/:id)
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub uuid: String,
    /// Element id to body, in insertion order
    pub elements: Map<String, Value>,
}

impl ListResponse {
    pub fn new(uuid: impl Into<String>, elements: Map<String, Value>) -> Self {
        Self {
            uuid: uuid.into(),
            elements,
        }
    }
}

/// Response body carrying one element
#[derive(Debug, Clone, Serialize)]
pub struct ElementResponse {
    pub uuid: String,
    pub body: Value,
}

impl ElementResponse {
    pub fn new(uuid: impl Into<String>, body: Value) -> Self {
        Self {
            uuid: uuid.into(),
            body,
        }
    }
}

/// Response body for delete operations
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub uuid: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(uuid: impl Into<String>) -> Self {
        let uuid = uuid.into();
        Self {
            message: format!("'{}' deleted successfully", uuid),
            uuid,
        }
    }
}

/// Response body for GET /lists/:id/counter
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub uuid: String,
    pub size: usize,
}

impl CounterResponse {
    pub fn new(uuid: impl Into<String>, size: usize) -> Self {
        Self {
            uuid: uuid.into(),
            size,
        }
    }
}

/// Response body for GET /lists/:id/headers
#[derive(Debug, Clone, Serialize)]
pub struct HeadersResponse {
    pub uuid: String,
    pub headers: Headers,
}

impl HeadersResponse {
    pub fn new(uuid: impl Into<String>, headers: Headers) -> Self {
        Self {
            uuid: uuid.into(),
            headers,
        }
    }
}

/// Response body for PUT /lists/:id/ttl
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub uuid: String,
    /// Remaining seconds, `None` when the list never expires
    pub ttl: Option<u64>,
}

impl TtlResponse {
    pub fn new(uuid: impl Into<String>, ttl: Option<u64>) -> Self {
        Self {
            uuid: uuid.into(),
            ttl,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active backend adapter
    pub driver: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(driver: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            driver: driver.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

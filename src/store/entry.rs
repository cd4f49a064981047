//! Store Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// Native value kinds held by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// Plain string (also used for counters)
    Scalar(String),
    /// Field/value pairs in insertion order
    Hash(Vec<(String, String)>),
}

impl StoredValue {
    /// Approximate payload size in bytes.
    pub fn approx_size(&self) -> usize {
        match self {
            StoredValue::Scalar(s) => s.len(),
            StoredValue::Hash(fields) => fields.iter().map(|(f, v)| f.len() + v.len()).sum(),
        }
    }
}

// == Store Entry ==
/// Represents a single store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: StoredValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new store entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: StoredValue, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            created_at: now,
            expires_at: ttl_seconds.map(|ttl| now.saturating_add(ttl.saturating_mul(1000))),
        }
    }

    // == Set Expiry ==
    /// Restarts the expiry window, or clears it with `None`.
    pub fn set_ttl(&mut self, ttl_seconds: Option<u64>) {
        self.expires_at =
            ttl_seconds.map(|ttl| current_timestamp_ms().saturating_add(ttl.saturating_mul(1000)));
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal
    /// to the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }

    /// Returns remaining TTL in seconds, rounded up, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| ms.div_ceil(1000))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

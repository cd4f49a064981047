//! Store Module
//!
//! The key/value primitive every backend adapter is built on, and an
//! in-process implementation of it with lazy TTL expiration.

mod entry;
mod memory;
mod stats;

use serde_json::Value;

use crate::error::{ListError, Result};

// Re-export public types
pub use entry::{current_timestamp_ms, StoreEntry, StoredValue};
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Key Value Store ==
/// Minimum primitive set required from an external store.
///
/// Implementations must be safe to share between callers. TTLs are in
/// seconds; `None` means no expiry.
pub trait KeyValueStore: Send + Sync {
    /// Reads a scalar value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a scalar value, replacing any previous value and expiry.
    fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<()>;

    /// Overwrites an existing scalar, keeping its expiry. Returns false when
    /// the key is absent.
    fn replace(&self, key: &str, value: String) -> Result<bool>;

    /// Deletes a whole key. Returns false when the key was absent.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Writes one field of a hash, creating the hash when absent.
    fn hset(&self, key: &str, field: &str, value: String) -> Result<()>;

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Deletes one field of a hash. The hash is removed with its last field.
    fn hdel(&self, key: &str, field: &str) -> Result<bool>;

    /// All fields of a hash in insertion order; empty when absent.
    fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>>;

    /// Atomically adds `delta` to an integer counter, creating it at 0.
    fn incr_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// Sets or clears the expiry of an existing key.
    fn expire(&self, key: &str, _ttl: Option<u64>) -> Result<bool> {
        Err(ListError::Unsupported(format!("expire on {}", key)))
    }

    /// Remaining TTL in seconds; `None` for absent keys or keys without expiry.
    fn ttl(&self, key: &str) -> Result<Option<u64>>;

    /// Removes every key from the store.
    fn flush(&self) -> Result<()>;

    /// Backend-native diagnostics.
    fn info(&self) -> Result<Value>;
}

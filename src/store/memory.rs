//! Memory Store Module
//!
//! In-process key/value store with hashes, counters and TTL expiration.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::{ListError, Result};
use crate::store::{KeyValueStore, StoreEntry, StoreStats, StoredValue};

#[derive(Debug, Default)]
struct StoreInner {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
    /// Diagnostic counters
    stats: StoreStats,
}

impl StoreInner {
    /// Returns the live entry for `key`, dropping it first if it expired.
    fn live(&mut self, key: &str) -> Option<&mut StoreEntry> {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
        }
        self.entries.get_mut(key)
    }

    /// Like [`live`](Self::live), recording a hit or miss.
    fn read(&mut self, key: &str) -> Option<&mut StoreEntry> {
        let found = self.live(key).is_some();
        if found {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        self.entries.get_mut(key)
    }
}

fn wrong_type(key: &str) -> ListError {
    ListError::Backend(format!(
        "WRONGTYPE operation against key {} holding the wrong kind of value",
        key
    ))
}

// == Memory Store ==
/// Thread-safe in-memory store.
///
/// Expired keys are removed lazily on access and by
/// [`cleanup_expired`](Self::cleanup_expired).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired());

        let count = before - inner.entries.len();
        inner.stats.record_expired(count);
        count
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut stats = inner.stats.clone();
        stats.total_keys = inner.entries.len();
        stats.memory_bytes = inner
            .entries
            .iter()
            .map(|(key, entry)| key.len() + entry.value.approx_size())
            .sum();
        stats
    }

    /// Keys currently held, expired or not, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut inner = self.inner.write();
        match inner.read(key).map(|entry| &entry.value) {
            Some(StoredValue::Scalar(value)) => Ok(Some(value.clone())),
            Some(StoredValue::Hash(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<()> {
        let mut inner = self.inner.write();
        inner
            .entries
            .insert(key.to_string(), StoreEntry::new(StoredValue::Scalar(value), ttl));
        Ok(())
    }

    fn replace(&self, key: &str, value: String) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.live(key) {
            Some(entry) => {
                entry.value = StoredValue::Scalar(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let existed = inner.live(key).is_some();
        inner.entries.remove(key);
        Ok(existed)
    }

    fn hset(&self, key: &str, field: &str, value: String) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.live(key).is_none() {
            inner.entries.insert(
                key.to_string(),
                StoreEntry::new(StoredValue::Hash(Vec::new()), None),
            );
        }

        let entry = inner.entries.get_mut(key).ok_or_else(|| wrong_type(key))?;
        let StoredValue::Hash(fields) = &mut entry.value else {
            return Err(wrong_type(key));
        };
        match fields.iter_mut().find(|(f, _)| f == field) {
            Some((_, existing)) => *existing = value,
            None => fields.push((field.to_string(), value)),
        }
        Ok(())
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut inner = self.inner.write();
        match inner.read(key).map(|entry| &entry.value) {
            Some(StoredValue::Hash(fields)) => Ok(fields
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, v)| v.clone())),
            Some(StoredValue::Scalar(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    fn hdel(&self, key: &str, field: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let (removed, now_empty) = match inner.live(key).map(|entry| &mut entry.value) {
            Some(StoredValue::Hash(fields)) => {
                let before = fields.len();
                fields.retain(|(f, _)| f != field);
                (fields.len() < before, fields.is_empty())
            }
            Some(StoredValue::Scalar(_)) => return Err(wrong_type(key)),
            None => return Ok(false),
        };

        if now_empty {
            inner.entries.remove(key);
        }
        Ok(removed)
    }

    fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>> {
        let mut inner = self.inner.write();
        match inner.read(key).map(|entry| &entry.value) {
            Some(StoredValue::Hash(fields)) => Ok(fields.clone()),
            Some(StoredValue::Scalar(_)) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut inner = self.inner.write();
        if inner.live(key).is_none() {
            inner.entries.insert(
                key.to_string(),
                StoreEntry::new(StoredValue::Scalar("0".to_string()), None),
            );
        }

        let entry = inner.entries.get_mut(key).ok_or_else(|| wrong_type(key))?;
        let StoredValue::Scalar(raw) = &mut entry.value else {
            return Err(wrong_type(key));
        };
        let current: i64 = raw.parse().map_err(|_| {
            ListError::Backend(format!("value of {} is not an integer", key))
        })?;

        let next = current + delta;
        *raw = next.to_string();
        Ok(next)
    }

    fn expire(&self, key: &str, ttl: Option<u64>) -> Result<bool> {
        let mut inner = self.inner.write();
        match inner.live(key) {
            Some(entry) => {
                entry.set_ttl(ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ttl(&self, key: &str) -> Result<Option<u64>> {
        let mut inner = self.inner.write();
        Ok(inner.live(key).and_then(|entry| entry.ttl_remaining()))
    }

    fn flush(&self) -> Result<()> {
        let mut inner = self.inner.write();
        let count = inner.entries.len();
        inner.entries.clear();
        debug!("Memory store flushed, {} keys removed", count);
        Ok(())
    }

    fn info(&self) -> Result<Value> {
        let stats = self.stats();
        let mut info = serde_json::to_value(&stats)?;
        if let Value::Object(map) = &mut info {
            map.insert("hit_rate".to_string(), Value::from(stats.hit_rate()));
        }
        Ok(info)
    }
}

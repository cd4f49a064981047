//! Store Statistics Module
//!
//! Tracks store diagnostics: hits, misses, expirations and memory usage.

use serde::Serialize;

// == Store Stats ==
/// Diagnostic counters of a [`MemoryStore`](super::MemoryStore).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads of absent or expired keys
    pub misses: u64,
    /// Number of keys dropped because their TTL elapsed
    pub expired: u64,
    /// Current number of keys
    pub total_keys: usize,
    /// Approximate bytes held by keys and values
    pub memory_bytes: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }
}

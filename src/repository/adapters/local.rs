//! Local Backend
//!
//! Adapter for a process-local key/value cache. The cache can only attach an
//! expiry when a value is stored, so changing a TTL or rewriting a chunk
//! re-stores the record. Expired records are dropped on access and by the
//! background sweep.

use std::sync::Arc;

use serde_json::Value;

use crate::codec::{Codec, JsonCodec};
use crate::domain::{CollectionId, ElementId, Headers, IndexEntry};
use crate::error::Result;
use crate::repository::adapters::flat::FlatRecords;
use crate::repository::{Chunk, ChunkBackend};
use crate::store::KeyValueStore;

pub struct LocalBackend {
    records: FlatRecords,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_codec(store, Arc::new(JsonCodec))
    }

    pub fn with_codec(store: Arc<dyn KeyValueStore>, codec: Arc<dyn Codec>) -> Self {
        Self {
            records: FlatRecords::new(store, codec),
        }
    }

    /// Stores `value` again with the key's remaining expiry.
    fn restore(&self, key: &str, value: String) -> Result<()> {
        let ttl = self.records.store.ttl(key)?;
        self.records.store.set(key, value, ttl)
    }
}

impl ChunkBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn read_chunk(&self, key: &str) -> Result<Option<Chunk>> {
        self.records.read_chunk(key)
    }

    fn write_chunk(&self, key: &str, chunk: &Chunk, ttl: Option<u64>) -> Result<()> {
        let encoded = self.records.encode_chunk(chunk)?;
        self.records.store.set(key, encoded, ttl)
    }

    fn put_element(&self, key: &str, element: &ElementId, body: &Value) -> Result<()> {
        let edited = self.records.edit_chunk(key, |chunk| {
            chunk.insert(element.to_string(), body.clone());
            true
        })?;
        match edited {
            Some((encoded, _)) => self.restore(key, encoded),
            None => {
                let mut chunk = Chunk::new();
                chunk.insert(element.to_string(), body.clone());
                self.write_chunk(key, &chunk, None)
            }
        }
    }

    fn remove_element(&self, key: &str, element: &ElementId) -> Result<bool> {
        let edited = self.records.edit_chunk(key, |chunk| {
            let before = chunk.len();
            *chunk = std::mem::take(chunk)
                .into_iter()
                .filter(|(id, _)| id != element.as_str())
                .collect();
            chunk.len() < before
        })?;
        match edited {
            Some((encoded, true)) => {
                self.restore(key, encoded)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn read_headers(&self, key: &str) -> Result<Option<Headers>> {
        self.records.read_headers(key)
    }

    fn write_headers(&self, key: &str, headers: &Headers, ttl: Option<u64>) -> Result<()> {
        let encoded = self.records.encode_headers(headers)?;
        self.records.store.set(key, encoded, ttl)
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        self.records.store.delete(key)?;
        Ok(())
    }

    fn apply_ttl(&self, key: &str, ttl: Option<u64>) -> Result<()> {
        if let Some(value) = self.records.store.get(key)? {
            self.records.store.set(key, value, ttl)?;
        }
        Ok(())
    }

    fn index_entry(&self, id: &CollectionId) -> Result<Option<IndexEntry>> {
        self.records.index_entry(id)
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>> {
        Ok(self.records.index()?.into_values().collect())
    }

    fn put_index_entry(&self, entry: &IndexEntry) -> Result<()> {
        self.records.put_index_entry(entry)
    }

    fn remove_index_entry(&self, id: &CollectionId) -> Result<()> {
        self.records.remove_index_entry(id)
    }

    fn flush(&self) -> Result<()> {
        self.records.store.flush()
    }

    fn statistics(&self) -> Result<Value> {
        self.records.store.info()
    }
}

//! Memcached Backend
//!
//! Adapter for a distributed memory-object cache: one record per chunk,
//! native per-key expiry (`touch`), and in-place `replace` that keeps a
//! record's expiry.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::codec::{Codec, JsonCodec};
use crate::domain::{CollectionId, ElementId, Headers, IndexEntry};
use crate::error::Result;
use crate::repository::adapters::flat::FlatRecords;
use crate::repository::{Chunk, ChunkBackend};
use crate::store::KeyValueStore;

pub struct MemcachedBackend {
    records: FlatRecords,
}

impl MemcachedBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_codec(store, Arc::new(JsonCodec))
    }

    pub fn with_codec(store: Arc<dyn KeyValueStore>, codec: Arc<dyn Codec>) -> Self {
        Self {
            records: FlatRecords::new(store, codec),
        }
    }
}

impl ChunkBackend for MemcachedBackend {
    fn name(&self) -> &'static str {
        "memcached"
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
        if let Some((encoded, _)) = edited {
            if self.records.store.replace(key, encoded)? {
                return Ok(());
            }
        }

        let mut chunk = Chunk::new();
        chunk.insert(element.to_string(), body.clone());
        self.write_chunk(key, &chunk, None)
    }

    fn remove_element(&self, key: &str, element: &ElementId) -> Result<bool> {
        let edited = self.records.edit_chunk(key, |chunk| {
            if !chunk.contains_key(element.as_str()) {
                return false;
            }
            *chunk = std::mem::take(chunk)
                .into_iter()
                .filter(|(id, _)| id != element.as_str())
                .collect();
            true
        })?;
        match edited {
            Some((encoded, true)) => self.records.store.replace(key, encoded),
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
        self.records.store.expire(key, ttl)?;
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
        Ok(json!({ "memcached": self.records.store.info()? }))
    }
}

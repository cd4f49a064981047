//! Redis Backend
//!
//! Adapter for a remote hash-map store. Each chunk is a hash with one field
//! per element, the headers are a hash, and the index is one hash with one
//! field per collection. Element counts live in an atomic counter key
//! `{collection}:counter` beside the index.

use std::sync::Arc;

use serde_json::Value;

use crate::codec::{Codec, JsonCodec};
use crate::domain::{CollectionId, ElementId, Headers, IndexEntry, INDEX, SEPARATOR};
use crate::error::{ListError, Result};
use crate::repository::{Chunk, ChunkBackend};
use crate::store::KeyValueStore;

/// Segment name of the per-collection counter key
pub const COUNTER: &str = "counter";

pub struct RedisBackend {
    store: Arc<dyn KeyValueStore>,
    codec: Arc<dyn Codec>,
}

impl RedisBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_codec(store, Arc::new(JsonCodec))
    }

    pub fn with_codec(store: Arc<dyn KeyValueStore>, codec: Arc<dyn Codec>) -> Self {
        Self { store, codec }
    }

    pub fn counter_key(id: &CollectionId) -> String {
        format!("{}{}{}", id, SEPARATOR, COUNTER)
    }
}

impl ChunkBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn read_chunk(&self, key: &str) -> Result<Option<Chunk>> {
        let fields = self.store.hgetall(key)?;
        if fields.is_empty() {
            return Ok(None);
        }

        let mut chunk = Chunk::new();
        for (field, raw) in fields {
            chunk.insert(field, self.codec.decode(&raw)?);
        }
        Ok(Some(chunk))
    }

    fn write_chunk(&self, key: &str, chunk: &Chunk, ttl: Option<u64>) -> Result<()> {
        for (field, body) in chunk {
            self.store.hset(key, field, self.codec.encode(body)?)?;
        }
        if ttl.is_some() {
            self.store.expire(key, ttl)?;
        }
        Ok(())
    }

    fn put_element(&self, key: &str, element: &ElementId, body: &Value) -> Result<()> {
        self.store.hset(key, element.as_str(), self.codec.encode(body)?)
    }

    fn remove_element(&self, key: &str, element: &ElementId) -> Result<bool> {
        self.store.hdel(key, element.as_str())
    }

    fn read_headers(&self, key: &str) -> Result<Option<Headers>> {
        let fields = self.store.hgetall(key)?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(fields.into_iter().collect()))
    }

    fn write_headers(&self, key: &str, headers: &Headers, ttl: Option<u64>) -> Result<()> {
        for (field, value) in headers {
            self.store.hset(key, field, value.clone())?;
        }
        if ttl.is_some() {
            self.store.expire(key, ttl)?;
        }
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        self.store.delete(key)?;
        Ok(())
    }

    fn apply_ttl(&self, key: &str, ttl: Option<u64>) -> Result<()> {
        self.store.expire(key, ttl)?;
        Ok(())
    }

    fn index_entry(&self, id: &CollectionId) -> Result<Option<IndexEntry>> {
        match self.store.hget(INDEX, id.as_str())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>> {
        self.store
            .hgetall(INDEX)?
            .into_iter()
            .map(|(_, raw)| serde_json::from_str(&raw).map_err(ListError::from))
            .collect()
    }

    fn put_index_entry(&self, entry: &IndexEntry) -> Result<()> {
        self.store
            .hset(INDEX, entry.uuid.as_str(), serde_json::to_string(entry)?)
    }

    fn remove_index_entry(&self, id: &CollectionId) -> Result<()> {
        self.store.hdel(INDEX, id.as_str())?;
        Ok(())
    }

    fn init_size(&self, id: &CollectionId, size: usize, ttl: Option<u64>) -> Result<()> {
        self.store.set(&Self::counter_key(id), size.to_string(), ttl)
    }

    fn adjust_size(&self, id: &CollectionId, _current: usize, delta: i64) -> Result<usize> {
        let next = self.store.incr_by(&Self::counter_key(id), delta)?;
        Ok(next.max(0) as usize)
    }

    fn live_size(&self, id: &CollectionId) -> Result<Option<usize>> {
        Ok(self
            .store
            .get(&Self::counter_key(id))?
            .and_then(|raw| raw.parse().ok()))
    }

    fn auxiliary_keys(&self, id: &CollectionId) -> Vec<String> {
        vec![Self::counter_key(id)]
    }

    fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    fn statistics(&self) -> Result<Value> {
        self.store.info()
    }
}

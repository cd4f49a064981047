//! Flat Records
//!
//! Encoding shared by adapters whose primitive is a flat key/value cache:
//! each chunk is one record, the headers are one record, and the index is a
//! single aggregate record keyed by collection id.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::codec::Codec;
use crate::domain::{CollectionId, Headers, IndexEntry, INDEX};
use crate::error::{ListError, Result};
use crate::repository::Chunk;
use crate::store::KeyValueStore;

pub(crate) struct FlatRecords {
    pub(crate) store: Arc<dyn KeyValueStore>,
    codec: Arc<dyn Codec>,
    /// Serializes read-modify-write of the aggregate index record, which is
    /// shared by every collection.
    index_lock: Mutex<()>,
}

impl FlatRecords {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, codec: Arc<dyn Codec>) -> Self {
        Self {
            store,
            codec,
            index_lock: Mutex::new(()),
        }
    }

    pub(crate) fn read_chunk(&self, key: &str) -> Result<Option<Chunk>> {
        match self.store.get(key)? {
            Some(raw) => match self.codec.decode(&raw)? {
                Value::Object(chunk) => Ok(Some(chunk)),
                _ => Err(ListError::Backend(format!("{} does not hold a chunk", key))),
            },
            None => Ok(None),
        }
    }

    pub(crate) fn encode_chunk(&self, chunk: &Chunk) -> Result<String> {
        self.codec.encode(&Value::Object(chunk.clone()))
    }

    /// Reads a chunk, applies `edit` and returns the re-encoded record.
    /// `None` when the chunk is absent.
    pub(crate) fn edit_chunk<F>(&self, key: &str, edit: F) -> Result<Option<(String, bool)>>
    where
        F: FnOnce(&mut Chunk) -> bool,
    {
        let Some(mut chunk) = self.read_chunk(key)? else {
            return Ok(None);
        };
        let changed = edit(&mut chunk);
        Ok(Some((self.encode_chunk(&chunk)?, changed)))
    }

    pub(crate) fn read_headers(&self, key: &str) -> Result<Option<Headers>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn encode_headers(&self, headers: &Headers) -> Result<String> {
        Ok(serde_json::to_string(headers)?)
    }

    // == Aggregate Index ==

    pub(crate) fn index(&self) -> Result<BTreeMap<String, IndexEntry>> {
        match self.store.get(INDEX)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write_index(&self, index: &BTreeMap<String, IndexEntry>) -> Result<()> {
        if index.is_empty() {
            self.store.delete(INDEX)?;
            return Ok(());
        }
        self.store.set(INDEX, serde_json::to_string(index)?, None)
    }

    pub(crate) fn index_entry(&self, id: &CollectionId) -> Result<Option<IndexEntry>> {
        Ok(self.index()?.remove(id.as_str()))
    }

    pub(crate) fn put_index_entry(&self, entry: &IndexEntry) -> Result<()> {
        let _guard = self.index_lock.lock();
        let mut index = self.index()?;
        index.insert(entry.uuid.to_string(), entry.clone());
        self.write_index(&index)
    }

    pub(crate) fn remove_index_entry(&self, id: &CollectionId) -> Result<()> {
        let _guard = self.index_lock.lock();
        let mut index = self.index()?;
        if index.remove(id.as_str()).is_some() {
            self.write_index(&index)?;
        }
        Ok(())
    }
}

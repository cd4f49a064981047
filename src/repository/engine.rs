//! Chunked Repository
//!
//! Chunk partitioning, index bookkeeping, element lookup across chunks and
//! TTL propagation, shared by every backend adapter.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::{
    validate_ttl, Collection, CollectionId, Element, ElementId, Headers, IndexEntry,
};
use crate::error::{ListError, Result};
use crate::repository::{
    chunk_count, chunk_key, headers_key, partition, Chunk, ChunkBackend, ElementMap,
    ListRepository, StripedLocks, DEFAULT_CHUNK_SIZE,
};

// == Chunked Repository ==
/// [`ListRepository`] implementation over any [`ChunkBackend`].
///
/// The chunk size a collection was created with is kept in its index entry
/// and read back from there; `chunk_size` here is only the default for new
/// collections and for entries that predate it.
pub struct ChunkedRepository<B> {
    backend: B,
    chunk_size: usize,
    locks: StripedLocks,
}

impl<B: ChunkBackend> ChunkedRepository<B> {
    // == Constructor ==
    pub fn new(backend: B, chunk_size: usize) -> Self {
        Self {
            backend,
            chunk_size: if chunk_size == 0 {
                DEFAULT_CHUNK_SIZE
            } else {
                chunk_size
            },
            locks: StripedLocks::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn effective_chunk_size(&self, entry: &IndexEntry) -> usize {
        if entry.chunk_size > 0 {
            entry.chunk_size
        } else {
            self.chunk_size
        }
    }

    // == Resolve ==
    /// Index entry of a live collection.
    ///
    /// Expired entries are purged and reported as absent. When the index has
    /// no entry but the backend keeps a live count, an entry is rebuilt from
    /// `ceil(count / chunk_size)`.
    fn resolve(&self, id: &CollectionId) -> Result<Option<IndexEntry>> {
        if let Some(entry) = self.backend.index_entry(id)? {
            if entry.is_expired() {
                debug!("Collection {} expired, purging", id);
                self.purge(&entry)?;
                return Ok(None);
            }
            return Ok(Some(entry));
        }

        match self.backend.live_size(id)? {
            Some(size) if size > 0 => Ok(Some(IndexEntry::new(
                id.clone(),
                size,
                chunk_count(size, self.chunk_size),
                self.chunk_size,
                None,
            ))),
            _ => Ok(None),
        }
    }

    fn require(&self, id: &CollectionId) -> Result<IndexEntry> {
        self.resolve(id)?
            .ok_or_else(|| ListError::CollectionNotFound(id.to_string()))
    }

    fn exists(&self, id: &CollectionId) -> Result<bool> {
        Ok(self.resolve(id)?.is_some() || self.backend.read_chunk(&chunk_key(id, 1))?.is_some())
    }

    // == Locate ==
    /// Scans chunks in ascending order for the one holding `element`.
    fn locate(
        &self,
        id: &CollectionId,
        element: &ElementId,
        chunks: usize,
    ) -> Result<Option<(String, Chunk)>> {
        for n in 1..=chunks {
            let key = chunk_key(id, n);
            if let Some(chunk) = self.backend.read_chunk(&key)? {
                if chunk.contains_key(element.as_str()) {
                    return Ok(Some((key, chunk)));
                }
            }
        }
        Ok(None)
    }

    /// Merges chunk 1..=chunks; earlier chunks win on key collisions.
    fn read_all(&self, id: &CollectionId, chunks: usize) -> Result<ElementMap> {
        let mut merged = ElementMap::new();
        for n in 1..=chunks {
            if let Some(chunk) = self.backend.read_chunk(&chunk_key(id, n))? {
                for (key, body) in chunk {
                    merged.entry(key).or_insert(body);
                }
            }
        }
        Ok(merged)
    }

    // == Purge ==
    /// Removes every key of a collection and its index entry.
    fn purge(&self, entry: &IndexEntry) -> Result<()> {
        let id = &entry.uuid;
        for n in 1..=entry.chunks {
            self.backend.delete_key(&chunk_key(id, n))?;
        }
        self.backend.delete_key(&headers_key(id))?;
        for key in self.backend.auxiliary_keys(id) {
            self.backend.delete_key(&key)?;
        }
        self.backend.remove_index_entry(id)?;

        info!("[{}] Collection {} removed", self.backend.name(), id);
        Ok(())
    }
}

impl<B: ChunkBackend> ListRepository for ChunkedRepository<B> {
    fn create(
        &self,
        collection: Collection,
        ttl: Option<u64>,
        chunk_size: Option<usize>,
    ) -> Result<ElementMap> {
        let ttl = validate_ttl(ttl)?;
        let chunk_size = chunk_size.unwrap_or(self.chunk_size);
        if chunk_size == 0 {
            return Err(ListError::InvalidParameter(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if collection.is_empty() {
            return Err(ListError::EmptyInput);
        }

        let id = collection.id().clone();
        let _guard = self.locks.lock(id.as_str());

        if self.exists(&id)? {
            return Err(ListError::CollectionAlreadyExists(id.to_string()));
        }

        let chunks = partition(collection.items(), chunk_size);
        for (n, chunk) in chunks.iter().enumerate() {
            self.backend.write_chunk(&chunk_key(&id, n + 1), chunk, ttl)?;
        }
        self.backend.init_size(&id, collection.len(), ttl)?;

        let entry = IndexEntry::new(id.clone(), collection.len(), chunks.len(), chunk_size, ttl);
        self.backend.put_index_entry(&entry)?;

        if !collection.headers().is_empty() {
            self.backend
                .write_headers(&headers_key(&id), collection.headers(), ttl)?;
        }

        info!(
            "[{}] Collection {} created: {} elements in {} chunks, ttl={:?}",
            self.backend.name(),
            id,
            entry.size,
            entry.chunks,
            ttl
        );

        self.read_all(&id, entry.chunks)
    }

    fn delete(&self, id: &CollectionId) -> Result<()> {
        let _guard = self.locks.lock(id.as_str());
        let entry = self.require(id)?;
        self.purge(&entry)
    }

    fn delete_element(&self, id: &CollectionId, element: &ElementId) -> Result<()> {
        let _guard = self.locks.lock(id.as_str());
        let mut entry = self.require(id)?;

        let (key, _) = self
            .locate(id, element, entry.chunks)?
            .ok_or_else(|| ListError::ElementNotFound(element.to_string()))?;
        if !self.backend.remove_element(&key, element)? {
            return Err(ListError::ElementNotFound(element.to_string()));
        }
        debug!("[{}] Element {} removed from {}", self.backend.name(), element, key);

        entry.size = self.backend.adjust_size(id, entry.size, -1)?;
        if entry.size == 0 {
            self.purge(&entry)
        } else {
            self.backend.put_index_entry(&entry)
        }
    }

    fn find_by_collection_id(&self, id: &CollectionId) -> Result<ElementMap> {
        match self.resolve(id)? {
            Some(entry) => self.read_all(id, entry.chunks),
            None => Ok(ElementMap::new()),
        }
    }

    fn find_element(&self, id: &CollectionId, element: &ElementId) -> Result<Value> {
        let chunks = self.resolve(id)?.map_or(0, |entry| entry.chunks);
        self.locate(id, element, chunks)?
            .and_then(|(_, mut chunk)| chunk.remove(element.as_str()))
            .ok_or_else(|| ListError::ElementNotFound(element.to_string()))
    }

    fn exists_element(&self, id: &CollectionId, element: &ElementId) -> Result<bool> {
        let chunks = self.resolve(id)?.map_or(0, |entry| entry.chunks);
        Ok(self.locate(id, element, chunks)?.is_some())
    }

    fn push_element(&self, id: &CollectionId, element: Element) -> Result<()> {
        let _guard = self.locks.lock(id.as_str());
        let mut entry = self.require(id)?;

        if self.locate(id, element.id(), entry.chunks)?.is_some() {
            return Err(ListError::DuplicateElement(element.id().to_string()));
        }

        let chunk_size = self.effective_chunk_size(&entry);
        let last_key = chunk_key(id, entry.chunks.max(1));
        let (element_id, body) = element.into_parts();

        match self.backend.read_chunk(&last_key)? {
            Some(chunk) if entry.chunks > 0 && chunk.len() < chunk_size => {
                self.backend.put_element(&last_key, &element_id, &body)?;
            }
            None if entry.chunks > 0 => {
                // last chunk emptied out or expired; rewrite it
                let mut chunk = Chunk::new();
                chunk.insert(element_id.to_string(), body);
                self.backend
                    .write_chunk(&last_key, &chunk, entry.remaining_ttl())?;
            }
            _ => {
                entry.chunks += 1;
                let mut chunk = Chunk::new();
                chunk.insert(element_id.to_string(), body);
                self.backend.write_chunk(
                    &chunk_key(id, entry.chunks),
                    &chunk,
                    entry.remaining_ttl(),
                )?;
            }
        }

        entry.size = self.backend.adjust_size(id, entry.size, 1)?;
        if entry.chunk_size == 0 {
            entry.chunk_size = chunk_size;
        }
        self.backend.put_index_entry(&entry)
    }

    fn update_element(
        &self,
        id: &CollectionId,
        element: &ElementId,
        fields: &Map<String, Value>,
    ) -> Result<Value> {
        let _guard = self.locks.lock(id.as_str());
        let entry = self.require(id)?;

        let (key, mut chunk) = self
            .locate(id, element, entry.chunks)?
            .ok_or_else(|| ListError::ElementNotFound(element.to_string()))?;

        let merged = match chunk.remove(element.as_str()) {
            Some(Value::Object(mut body)) => {
                for (field, value) in fields {
                    body.insert(field.clone(), value.clone());
                }
                Value::Object(body)
            }
            Some(_) => {
                return Err(ListError::InvalidParameter(format!(
                    "element {} has no fields to update",
                    element
                )))
            }
            None => return Err(ListError::ElementNotFound(element.to_string())),
        };

        self.backend.put_element(&key, element, &merged)?;
        debug!("[{}] Element {} updated in {}", self.backend.name(), element, key);
        Ok(merged)
    }

    fn update_ttl(&self, id: &CollectionId, ttl: Option<u64>) -> Result<()> {
        let ttl = validate_ttl(ttl)?;
        let _guard = self.locks.lock(id.as_str());
        let mut entry = match self.resolve(id)? {
            Some(entry) if entry.size > 0 => entry,
            _ => return Err(ListError::CollectionNotFound(id.to_string())),
        };

        for n in 1..=entry.chunks {
            self.backend.apply_ttl(&chunk_key(id, n), ttl)?;
        }
        self.backend.apply_ttl(&headers_key(id), ttl)?;
        for key in self.backend.auxiliary_keys(id) {
            self.backend.apply_ttl(&key, ttl)?;
        }

        entry.set_ttl(ttl);
        self.backend.put_index_entry(&entry)?;

        info!("[{}] Collection {} ttl set to {:?}", self.backend.name(), id, ttl);
        Ok(())
    }

    fn get_counter(&self, id: &CollectionId) -> Result<usize> {
        Ok(self.require(id)?.size)
    }

    fn get_headers(&self, id: &CollectionId) -> Result<Headers> {
        self.require(id)?;
        Ok(self
            .backend
            .read_headers(&headers_key(id))?
            .unwrap_or_default())
    }

    fn get_ttl(&self, id: &CollectionId) -> Result<Option<u64>> {
        Ok(self.require(id)?.remaining_ttl())
    }

    fn get_index(&self) -> Result<BTreeMap<String, IndexEntry>> {
        Ok(self
            .backend
            .index_entries()?
            .into_iter()
            .filter(|entry| !entry.is_expired())
            .map(|entry| (entry.uuid.to_string(), entry))
            .collect())
    }

    fn get_index_entry(&self, id: &CollectionId) -> Result<IndexEntry> {
        match self.backend.index_entry(id)? {
            Some(entry) if !entry.is_expired() => Ok(entry),
            _ => Err(ListError::CollectionNotFound(id.to_string())),
        }
    }

    fn get_statistics(&self) -> Result<Value> {
        self.backend.statistics()
    }

    fn flush(&self) -> Result<()> {
        warn!(
            "[{}] Flushing the whole backend: every collection and the index are removed",
            self.backend.name()
        );
        self.backend.flush()
    }
}

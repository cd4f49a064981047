//! Chunk Backend
//!
//! Storage mechanics an adapter supplies to the chunking engine. The engine
//! owns the algorithm; a backend only decides how chunks, headers, the index
//! and TTLs map onto its native primitive.

use serde_json::Value;

use crate::domain::{CollectionId, ElementId, Headers, IndexEntry};
use crate::error::Result;
use crate::repository::Chunk;

pub trait ChunkBackend: Send + Sync {
    /// Driver name used in logs.
    fn name(&self) -> &'static str;

    /// Reads a whole chunk; `None` when the key is absent.
    fn read_chunk(&self, key: &str) -> Result<Option<Chunk>>;

    /// Writes a whole new chunk with the given expiry.
    fn write_chunk(&self, key: &str, chunk: &Chunk, ttl: Option<u64>) -> Result<()>;

    /// Inserts or overwrites one element of an existing chunk in place,
    /// keeping the chunk's current expiry.
    fn put_element(&self, key: &str, element: &ElementId, body: &Value) -> Result<()>;

    /// Removes one element from a chunk, keeping the chunk's current expiry.
    fn remove_element(&self, key: &str, element: &ElementId) -> Result<bool>;

    fn read_headers(&self, key: &str) -> Result<Option<Headers>>;

    fn write_headers(&self, key: &str, headers: &Headers, ttl: Option<u64>) -> Result<()>;

    fn delete_key(&self, key: &str) -> Result<()>;

    /// Sets or clears the expiry of a key. Absent keys are ignored.
    fn apply_ttl(&self, key: &str, ttl: Option<u64>) -> Result<()>;

    fn index_entry(&self, id: &CollectionId) -> Result<Option<IndexEntry>>;

    fn index_entries(&self) -> Result<Vec<IndexEntry>>;

    /// Inserts or replaces the entry of `entry.uuid`.
    fn put_index_entry(&self, entry: &IndexEntry) -> Result<()>;

    fn remove_index_entry(&self, id: &CollectionId) -> Result<()>;

    // == Size Counter Hooks ==
    // Backends with an atomic counter primitive keep a live element count
    // beside the index. The defaults do plain arithmetic on the index size.

    /// Records the initial element count of a new collection.
    fn init_size(&self, _id: &CollectionId, _size: usize, _ttl: Option<u64>) -> Result<()> {
        Ok(())
    }

    /// Applies `delta` to the element count and returns the new count.
    fn adjust_size(&self, _id: &CollectionId, current: usize, delta: i64) -> Result<usize> {
        Ok((current as i64 + delta).max(0) as usize)
    }

    /// Live element count kept outside the index, if any.
    fn live_size(&self, _id: &CollectionId) -> Result<Option<usize>> {
        Ok(None)
    }

    /// Extra keys owned by a collection besides chunks and headers.
    fn auxiliary_keys(&self, _id: &CollectionId) -> Vec<String> {
        Vec::new()
    }

    /// Clears the whole backend.
    fn flush(&self) -> Result<()>;

    fn statistics(&self) -> Result<Value>;
}

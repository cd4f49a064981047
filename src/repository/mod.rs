//! Repository Module
//!
//! The operation set every backend adapter exposes, and the chunking/index
//! engine that implements it over a [`ChunkBackend`].
//!
//! # Key layout
//! - `{collection}:chunk-{n}` - chunk `n` (1-based) of a collection
//! - `{collection}:headers` - caller metadata
//! - `__index__` - process-wide index, one entry per live collection

pub mod adapters;
mod backend;
mod chunking;
mod engine;
mod locks;

#[cfg(test)]
mod property_tests;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::{Collection, CollectionId, Element, ElementId, Headers, IndexEntry};
use crate::error::Result;

// Re-export public types
pub use backend::ChunkBackend;
pub use chunking::{chunk_count, chunk_key, headers_key, partition, Chunk};
pub use engine::ChunkedRepository;
pub use locks::StripedLocks;

// == Public Constants ==
/// Chunk size used when neither the caller nor the configuration sets one
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Element bodies keyed by element id, in chunk order.
pub type ElementMap = Map<String, Value>;

// == List Repository ==
/// Uniform contract of every backend adapter.
pub trait ListRepository: Send + Sync {
    /// Stores a collection in chunks and returns the stored view.
    ///
    /// # Errors
    /// `CollectionAlreadyExists` if the id is already stored.
    fn create(
        &self,
        collection: Collection,
        ttl: Option<u64>,
        chunk_size: Option<usize>,
    ) -> Result<ElementMap>;

    /// Removes every chunk, the headers and the index entry of a collection.
    fn delete(&self, id: &CollectionId) -> Result<()>;

    /// Removes one element. The index size shrinks by one; chunks are not
    /// repacked. Fails with `ElementNotFound` when no chunk holds it.
    fn delete_element(&self, id: &CollectionId, element: &ElementId) -> Result<()>;

    /// All elements, merged from chunk 1 upwards. Empty when nothing is stored.
    fn find_by_collection_id(&self, id: &CollectionId) -> Result<ElementMap>;

    fn find_element(&self, id: &CollectionId, element: &ElementId) -> Result<Value>;

    fn exists_element(&self, id: &CollectionId, element: &ElementId) -> Result<bool>;

    /// Appends one element to the last chunk, opening a new one when full.
    fn push_element(&self, id: &CollectionId, element: Element) -> Result<()>;

    /// Shallow-merges `fields` over the element body and returns the result.
    fn update_element(
        &self,
        id: &CollectionId,
        element: &ElementId,
        fields: &Map<String, Value>,
    ) -> Result<Value>;

    /// Sets one expiry on every physical key of a collection.
    fn update_ttl(&self, id: &CollectionId, ttl: Option<u64>) -> Result<()>;

    /// Current element count.
    fn get_counter(&self, id: &CollectionId) -> Result<usize>;

    fn get_headers(&self, id: &CollectionId) -> Result<Headers>;

    /// Remaining TTL in seconds, `None` for no expiry.
    fn get_ttl(&self, id: &CollectionId) -> Result<Option<u64>>;

    /// Snapshot of the whole index keyed by collection id.
    fn get_index(&self) -> Result<BTreeMap<String, IndexEntry>>;

    fn get_index_entry(&self, id: &CollectionId) -> Result<IndexEntry>;

    /// Backend-native diagnostics.
    fn get_statistics(&self) -> Result<Value>;

    /// Clears the whole backend: every collection and the index, not just one
    /// collection.
    fn flush(&self) -> Result<()>;
}

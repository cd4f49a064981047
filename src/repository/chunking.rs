//! Chunking Module
//!
//! Key naming and partitioning of a collection into fixed-size chunks.

use serde_json::{Map, Value};

use crate::domain::{CollectionId, Element, CHUNK, HEADERS, SEPARATOR};

/// One chunk: element bodies keyed by element id, in insertion order.
pub type Chunk = Map<String, Value>;

/// Key of chunk `n` (1-based).
pub fn chunk_key(id: &CollectionId, n: usize) -> String {
    format!("{}{}{}-{}", id, SEPARATOR, CHUNK, n)
}

pub fn headers_key(id: &CollectionId) -> String {
    format!("{}{}{}", id, SEPARATOR, HEADERS)
}

/// Number of chunks needed for `size` elements.
pub fn chunk_count(size: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    size.div_ceil(chunk_size)
}

// == Partition ==
/// Splits elements, in order, into consecutive groups of at most
/// `chunk_size`. `chunk_size` must be non-zero.
pub fn partition(elements: &[Element], chunk_size: usize) -> Vec<Chunk> {
    elements
        .chunks(chunk_size)
        .map(|group| {
            group
                .iter()
                .map(|e| (e.id().to_string(), e.body().clone()))
                .collect()
        })
        .collect()
}

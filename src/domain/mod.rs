//! Domain Module
//!
//! Identifiers, elements, collections and the factory that builds them.

mod collection;
mod element;
mod factory;
mod id;
mod index;

// Re-export public types
pub use collection::{Collection, Headers};
pub use element::Element;
pub use factory::CollectionFactory;
pub use id::{
    CollectionId, ElementId, CHUNK, HEADERS, INDEX, RESERVED_TOKENS, SEPARATOR, STATISTICS,
};
pub use index::{validate_ttl, IndexEntry, MAX_TTL};

//! Backend Adapters
//!
//! Three interchangeable storage mappings for the chunking engine. They
//! differ only in how chunks, headers, the index and TTLs map onto the
//! underlying [`KeyValueStore`](crate::store::KeyValueStore).

mod flat;
mod local;
mod memcached;
mod redis;

use crate::repository::ChunkedRepository;

pub use local::LocalBackend;
pub use memcached::MemcachedBackend;
pub use redis::{RedisBackend, COUNTER};

pub type LocalRepository = ChunkedRepository<LocalBackend>;
pub type MemcachedRepository = ChunkedRepository<MemcachedBackend>;
pub type RedisRepository = ChunkedRepository<RedisBackend>;

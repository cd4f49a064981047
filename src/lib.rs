//! List Cache - chunked storage of large ordered collections
//!
//! Splits a keyed list of JSON elements into fixed-size chunks on a
//! key/value backend and keeps a per-collection index entry alongside.

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use client::{Client, CreateOptions, Driver};
pub use config::Config;
pub use error::{ListError, Result};
pub use repository::ListRepository;
pub use store::{KeyValueStore, MemoryStore};
pub use tasks::spawn_cleanup_task;

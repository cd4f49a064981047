//! Client Module
//!
//! Facade over a repository: selects the backend adapter, validates create
//! options, and accepts plain string identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::domain::{
    validate_ttl, CollectionFactory, CollectionId, Element, ElementId, Headers, IndexEntry,
};
use crate::error::{ListError, Result};
use crate::repository::adapters::{LocalBackend, MemcachedBackend, RedisBackend};
use crate::repository::{ChunkedRepository, ElementMap, ListRepository};
use crate::store::KeyValueStore;

// == Driver ==
/// Backend adapter selected for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Driver {
    /// Process-local cache
    Local,
    /// Distributed memory-object cache
    Memcached,
    /// Remote hash-map store
    #[default]
    Redis,
}

impl FromStr for Driver {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "apcu" => Ok(Driver::Local),
            "memcached" => Ok(Driver::Memcached),
            "redis" => Ok(Driver::Redis),
            _ => Err(ListError::UnsupportedDriver(s.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Driver::Local => "local",
            Driver::Memcached => "memcached",
            Driver::Redis => "redis",
        })
    }
}

// == Create Options ==
/// Option keys accepted by [`Client::create`].
pub const ALLOWED_OPTIONS: [&str; 6] = ["chunk", "element-uuid", "headers", "index", "ttl", "uuid"];

/// Validated options of a create call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    /// Explicit collection id
    pub uuid: Option<String>,
    /// Field used to derive element ids
    pub element_uuid: Option<String>,
    pub headers: Headers,
    /// TTL in seconds
    pub ttl: Option<u64>,
    /// Chunk size for this collection
    pub chunk: Option<usize>,
}

impl CreateOptions {
    /// Parses raw options. Unknown keys are rejected before any value is
    /// looked at. `index` is accepted as a legacy name for `chunk`.
    pub fn from_map(options: &Map<String, Value>) -> Result<Self> {
        if let Some(unknown) = options.keys().find(|k| !ALLOWED_OPTIONS.contains(&k.as_str())) {
            return Err(ListError::UnsupportedParameter(unknown.clone()));
        }

        let chunk = match (options.get("chunk"), options.get("index")) {
            (Some(v), _) | (None, Some(v)) => Some(positive(v, "chunk")?),
            (None, None) => None,
        };

        Ok(Self {
            uuid: optional_string(options.get("uuid"), "uuid")?,
            element_uuid: optional_string(options.get("element-uuid"), "element-uuid")?,
            headers: headers(options.get("headers"))?,
            ttl: match options.get("ttl") {
                None | Some(Value::Null) => None,
                Some(v) => validate_ttl(Some(positive(v, "ttl")? as u64))?,
            },
            chunk,
        })
    }
}

fn optional_string(value: Option<&Value>, name: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ListError::InvalidParameter(format!("{} must be a string", name))),
    }
}

fn positive(value: &Value, name: &str) -> Result<usize> {
    value
        .as_u64()
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .ok_or_else(|| {
            ListError::InvalidParameter(format!("{} must be a positive integer", name))
        })
}

fn headers(value: Option<&Value>) -> Result<Headers> {
    match value {
        None | Some(Value::Null) => Ok(Headers::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Ok((k.clone(), other.to_string())),
            })
            .collect(),
        Some(_) => Err(ListError::InvalidParameter(
            "headers must be an object".to_string(),
        )),
    }
}

fn collection_id(raw: &str) -> Result<CollectionId> {
    if raw.is_empty() {
        return Err(ListError::InvalidIdentifier("empty collection id".to_string()));
    }
    CollectionId::new(Some(raw))
}

fn element_id(raw: &str) -> Result<ElementId> {
    if raw.is_empty() {
        return Err(ListError::InvalidIdentifier("empty element id".to_string()));
    }
    ElementId::new(Some(raw))
}

// == Client ==
/// Entry point used by the HTTP layer and embedding applications.
pub struct Client {
    driver: Driver,
    repository: Box<dyn ListRepository>,
    factory: CollectionFactory,
}

impl Client {
    // == Constructor ==
    /// Builds a client for `driver` over a shared store handle.
    pub fn new(driver: Driver, store: Arc<dyn KeyValueStore>, chunk_size: usize) -> Self {
        let repository: Box<dyn ListRepository> = match driver {
            Driver::Local => Box::new(ChunkedRepository::new(LocalBackend::new(store), chunk_size)),
            Driver::Memcached => Box::new(ChunkedRepository::new(
                MemcachedBackend::new(store),
                chunk_size,
            )),
            Driver::Redis => Box::new(ChunkedRepository::new(RedisBackend::new(store), chunk_size)),
        };
        info!("List client ready: driver={}, chunk_size={}", driver, chunk_size);

        Self {
            driver,
            repository,
            factory: CollectionFactory::new(),
        }
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn repository(&self) -> &dyn ListRepository {
        self.repository.as_ref()
    }

    // == Create ==
    /// Validates raw options, builds the collection and stores it.
    ///
    /// # Errors
    /// `UnsupportedParameter` for unknown option keys, before the backend is
    /// touched; otherwise any factory or repository error.
    pub fn create(&self, elements: Vec<Value>, options: &Map<String, Value>) -> Result<ElementMap> {
        self.create_list(elements, options).map(|(_, list)| list)
    }

    /// Like [`create`](Self::create), also returning the id the list was
    /// stored under.
    pub fn create_list(
        &self,
        elements: Vec<Value>,
        options: &Map<String, Value>,
    ) -> Result<(CollectionId, ElementMap)> {
        let options = CreateOptions::from_map(options)?;
        self.create_with(elements, options)
    }

    pub fn create_with(
        &self,
        elements: Vec<Value>,
        options: CreateOptions,
    ) -> Result<(CollectionId, ElementMap)> {
        let collection = self.factory.create(
            elements,
            options.headers,
            options.uuid.as_deref(),
            options.element_uuid.as_deref(),
        )?;
        let id = collection.id().clone();
        let list = self.repository.create(collection, options.ttl, options.chunk)?;
        Ok((id, list))
    }

    pub fn delete(&self, list: &str) -> Result<()> {
        self.repository.delete(&collection_id(list)?)
    }

    pub fn delete_element(&self, list: &str, element: &str) -> Result<()> {
        self.repository
            .delete_element(&collection_id(list)?, &element_id(element)?)
    }

    pub fn find_list_by_uuid(&self, list: &str) -> Result<ElementMap> {
        self.repository.find_by_collection_id(&collection_id(list)?)
    }

    pub fn find_element(&self, list: &str, element: &str) -> Result<Value> {
        self.repository
            .find_element(&collection_id(list)?, &element_id(element)?)
    }

    pub fn exists_element(&self, list: &str, element: &str) -> Result<bool> {
        self.repository
            .exists_element(&collection_id(list)?, &element_id(element)?)
    }

    /// Appends one element; the id is generated when `element` is `None`.
    pub fn push_element(&self, list: &str, element: Option<&str>, body: Value) -> Result<String> {
        let id = match element {
            Some(raw) => element_id(raw)?,
            None => ElementId::generate(),
        };
        let uuid = id.to_string();
        self.repository
            .push_element(&collection_id(list)?, Element::new(id, body))?;
        Ok(uuid)
    }

    pub fn update_element(
        &self,
        list: &str,
        element: &str,
        fields: &Map<String, Value>,
    ) -> Result<Value> {
        self.repository
            .update_element(&collection_id(list)?, &element_id(element)?, fields)
    }

    pub fn update_ttl(&self, list: &str, ttl: Option<u64>) -> Result<()> {
        self.repository.update_ttl(&collection_id(list)?, ttl)
    }

    pub fn get_counter(&self, list: &str) -> Result<usize> {
        self.repository.get_counter(&collection_id(list)?)
    }

    pub fn get_headers(&self, list: &str) -> Result<Headers> {
        self.repository.get_headers(&collection_id(list)?)
    }

    pub fn get_ttl(&self, list: &str) -> Result<Option<u64>> {
        self.repository.get_ttl(&collection_id(list)?)
    }

    pub fn get_index(&self) -> Result<BTreeMap<String, IndexEntry>> {
        self.repository.get_index()
    }

    pub fn get_index_entry(&self, list: &str) -> Result<IndexEntry> {
        self.repository.get_index_entry(&collection_id(list)?)
    }

    pub fn get_statistics(&self) -> Result<Value> {
        self.repository.get_statistics()
    }

    /// Clears the whole backend, not just one collection.
    pub fn flush(&self) -> Result<()> {
        self.repository.flush()
    }
}

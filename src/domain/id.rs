//! Identifier Module
//!
//! Validated collection and element identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ListError, Result};

// == Reserved Tokens ==
/// Marker for chunk keys: `{collection}:chunk-{n}`
pub const CHUNK: &str = "chunk";
/// Marker for the headers key: `{collection}:headers`
pub const HEADERS: &str = "headers";
/// Name of the process-wide index record
pub const INDEX: &str = "__index__";
/// Name reserved for backend statistics
pub const STATISTICS: &str = "__statistics__";
/// Separator between a collection id and an internal key segment
pub const SEPARATOR: &str = ":";

/// Substrings an element id must never contain.
pub const RESERVED_TOKENS: [&str; 5] = [CHUNK, HEADERS, INDEX, SEPARATOR, STATISTICS];

/// Replaces spaces with hyphens, or generates a v4 uuid for empty input.
fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => raw.replace(' ', "-"),
        _ => Uuid::new_v4().to_string(),
    }
}

// == Collection Id ==
/// Identifier of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    /// Builds an id from an optional raw string.
    ///
    /// Empty or absent input yields a random id. The index and statistics
    /// key names are rejected so a collection can never shadow them.
    pub fn new(raw: Option<&str>) -> Result<Self> {
        let id = normalize(raw);
        if id == INDEX || id == STATISTICS {
            return Err(ListError::InvalidIdentifier(format!(
                "{} is a reserved key name",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Element Id ==
/// Identifier of one element within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(String);

impl ElementId {
    /// Builds an id from an optional raw string.
    ///
    /// # Errors
    /// `ReservedIdentifier` when the raw value contains any of
    /// [`RESERVED_TOKENS`].
    pub fn new(raw: Option<&str>) -> Result<Self> {
        if let Some(raw) = raw {
            if let Some(token) = RESERVED_TOKENS.iter().copied().find(|t| raw.contains(t)) {
                return Err(ListError::ReservedIdentifier {
                    id: raw.to_string(),
                    token,
                });
            }
        }
        Ok(Self(normalize(raw)))
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ElementId {
    type Error = ListError;

    fn try_from(raw: String) -> Result<Self> {
        Self::new(Some(&raw))
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

//! Element Module
//!
//! One record of a collection: an identifier and an opaque body.

use serde_json::Value;

use crate::domain::ElementId;

// == Element ==
/// A keyed record. The body is never inspected by the storage engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    body: Value,
}

impl Element {
    pub fn new(id: ElementId, body: Value) -> Self {
        Self { id, body }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_parts(self) -> (ElementId, Value) {
        (self.id, self.body)
    }
}

//! Collection Module
//!
//! Ordered, duplicate-free set of elements with optional header metadata.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::domain::{CollectionId, Element, ElementId};
use crate::error::{ListError, Result};

/// Caller-defined string metadata attached to a collection.
pub type Headers = BTreeMap<String, String>;

// == Collection ==
/// In-memory collection, owned by the caller until handed to a repository.
///
/// Elements keep insertion order; `positions` maps each id to its slot in
/// `elements` and is rebuilt after removals.
#[derive(Debug, Clone)]
pub struct Collection {
    id: CollectionId,
    elements: Vec<Element>,
    positions: HashMap<ElementId, usize>,
    headers: Headers,
}

impl Collection {
    // == Constructor ==
    /// Creates an empty collection.
    pub fn new(id: CollectionId) -> Self {
        Self {
            id,
            elements: Vec::new(),
            positions: HashMap::new(),
            headers: Headers::new(),
        }
    }

    pub fn id(&self) -> &CollectionId {
        &self.id
    }

    // == Has Item ==
    pub fn has_item(&self, id: &ElementId) -> bool {
        self.positions.contains_key(id)
    }

    // == Add Item ==
    /// Appends an element.
    ///
    /// # Errors
    /// `DuplicateElement` if an element with the same id is present.
    pub fn add_item(&mut self, element: Element) -> Result<()> {
        if self.has_item(element.id()) {
            return Err(ListError::DuplicateElement(element.id().to_string()));
        }

        self.positions
            .insert(element.id().clone(), self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    // == Get Element ==
    pub fn get_element(&self, id: &ElementId) -> Result<&Element> {
        self.positions
            .get(id)
            .map(|&pos| &self.elements[pos])
            .ok_or_else(|| ListError::ElementNotFound(id.to_string()))
    }

    // == Update Element ==
    /// Replaces the body of an existing element in place.
    pub fn update_element(&mut self, id: &ElementId, body: Value) -> Result<()> {
        let pos = *self
            .positions
            .get(id)
            .ok_or_else(|| ListError::ElementNotFound(id.to_string()))?;
        self.elements[pos] = Element::new(id.clone(), body);
        Ok(())
    }

    // == Delete Element ==
    /// Removes an element, keeping the order of the others.
    pub fn delete_element(&mut self, id: &ElementId) -> Result<Element> {
        let pos = self
            .positions
            .remove(id)
            .ok_or_else(|| ListError::ElementNotFound(id.to_string()))?;
        let removed = self.elements.remove(pos);

        for slot in self.positions.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Ok(removed)
    }

    /// Elements in insertion order.
    pub fn items(&self) -> &[Element] {
        &self.elements
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

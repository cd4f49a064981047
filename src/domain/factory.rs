//! Collection Factory
//!
//! Builds a [`Collection`] from raw, heterogeneous input.

use serde_json::Value;

use crate::domain::{Collection, CollectionId, Element, ElementId, Headers};
use crate::error::{ListError, Result};

// == Collection Factory ==
/// Backend-agnostic builder for collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionFactory;

impl CollectionFactory {
    pub fn new() -> Self {
        Self
    }

    // == Create ==
    /// Builds a collection from `elements`, in input order.
    ///
    /// # Arguments
    /// * `elements` - Raw element bodies
    /// * `headers` - Metadata attached when non-empty
    /// * `collection_id` - Explicit collection id, generated when `None`
    /// * `element_id_field` - Field whose value becomes each element id;
    ///   ids are generated when `None`
    ///
    /// # Errors
    /// `EmptyInput`, `MissingKey`, `ReservedIdentifier`, `DuplicateElement`.
    pub fn create(
        &self,
        elements: Vec<Value>,
        headers: Headers,
        collection_id: Option<&str>,
        element_id_field: Option<&str>,
    ) -> Result<Collection> {
        if elements.is_empty() {
            return Err(ListError::EmptyInput);
        }

        let mut collection = Collection::new(CollectionId::new(collection_id)?);

        for body in elements {
            let id = match element_id_field {
                Some(field) => ElementId::new(Some(&field_value(&body, field)?))?,
                None => ElementId::generate(),
            };
            collection.add_item(Element::new(id, body))?;
        }

        if !headers.is_empty() {
            collection.set_headers(headers);
        }

        Ok(collection)
    }
}

/// Stringified value of `field` on an object body.
fn field_value(body: &Value, field: &str) -> Result<String> {
    match body.get(field) {
        None | Some(Value::Null) => Err(ListError::MissingKey(field.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<Value> {
        vec![
            json!({"userId": 1, "id": 1, "title": "sunt aut facere"}),
            json!({"userId": 1, "id": 2, "title": "qui est esse"}),
            json!({"userId": 1, "id": 3, "title": "ea molestias"}),
        ]
    }

    #[test]
    fn test_create_from_empty_input() {
        let result = CollectionFactory::new().create(vec![], Headers::new(), None, None);
        assert!(matches!(result, Err(ListError::EmptyInput)));
    }

    #[test]
    fn test_create_with_generated_ids() {
        let collection = CollectionFactory::new()
            .create(users(), Headers::new(), None, None)
            .unwrap();

        assert_eq!(collection.len(), 3);
        assert!(collection.headers().is_empty());
        assert_eq!(collection.items()[1].body()["title"], "qui est esse");
    }

    #[test]
    fn test_create_with_element_id_field() {
        let collection = CollectionFactory::new()
            .create(users(), Headers::new(), Some("simple list"), Some("id"))
            .unwrap();

        assert_eq!(collection.id().as_str(), "simple-list");
        let ids: Vec<&str> = collection.items().iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_string_field_is_not_quoted() {
        let collection = CollectionFactory::new()
            .create(
                vec![json!({"slug": "first post"})],
                Headers::new(),
                None,
                Some("slug"),
            )
            .unwrap();

        assert_eq!(collection.items()[0].id().as_str(), "first-post");
    }

    #[test]
    fn test_missing_field() {
        let mut input = users();
        input.push(json!({"title": "no id here"}));

        let result = CollectionFactory::new().create(input, Headers::new(), None, Some("id"));
        assert!(matches!(result, Err(ListError::MissingKey(key)) if key == "id"));
    }

    #[test]
    fn test_scalar_element_has_no_fields() {
        let result =
            CollectionFactory::new().create(vec![json!(42)], Headers::new(), None, Some("id"));
        assert!(matches!(result, Err(ListError::MissingKey(_))));
    }

    #[test]
    fn test_duplicate_derived_ids() {
        let input = vec![json!({"id": 7}), json!({"id": 7})];
        let result = CollectionFactory::new().create(input, Headers::new(), None, Some("id"));
        assert!(matches!(result, Err(ListError::DuplicateElement(_))));
    }

    #[test]
    fn test_headers_attached() {
        let mut headers = Headers::new();
        headers.insert("hash".to_string(), "ec457d0a974c48d5".to_string());

        let collection = CollectionFactory::new()
            .create(users(), headers.clone(), None, None)
            .unwrap();
        assert_eq!(collection.headers(), &headers);
    }
}

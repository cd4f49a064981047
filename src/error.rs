//! Error types for the list cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == List Error Enum ==
/// Unified error type for collections, repositories and backends.
#[derive(Error, Debug)]
pub enum ListError {
    /// Identifier is malformed or collides with a reserved key name
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Element identifier contains a reserved token
    #[error("You can't assign \"{id}\" as element uuid: it contains the reserved token \"{token}\"")]
    ReservedIdentifier { id: String, token: &'static str },

    /// Two elements of one collection share an identifier
    #[error("Key {0} already in use")]
    DuplicateElement(String),

    /// Element is absent from the collection
    #[error("Cannot retrieve the element {0} from the collection")]
    ElementNotFound(String),

    /// Collection id is already stored in the backend
    #[error("List {0} already exists in memory")]
    CollectionAlreadyExists(String),

    /// Collection id is not stored in the backend
    #[error("List {0} does not exist in memory")]
    CollectionNotFound(String),

    /// Attempt to build a collection from no elements
    #[error("Try to create a collection from an empty array")]
    EmptyInput,

    /// Field used to derive element ids is missing from an element
    #[error("{0} is not a valid key")]
    MissingKey(String),

    /// Unknown option passed to the facade
    #[error("Malformed parameters array provided: unsupported parameter {0}")]
    UnsupportedParameter(String),

    /// Known option with an unusable value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown backend driver name
    #[error("{0} is not a supported driver")]
    UnsupportedDriver(String),

    /// Backend primitive cannot perform the requested operation
    #[error("Operation not supported by backend: {0}")]
    Unsupported(String),

    /// Payload could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Failure reported by the backend primitive
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ListError {
    // == Status Code ==
    /// HTTP status used when the error crosses the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ListError::ElementNotFound(_) | ListError::CollectionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ListError::DuplicateElement(_) | ListError::CollectionAlreadyExists(_) => {
                StatusCode::CONFLICT
            }
            ListError::InvalidIdentifier(_)
            | ListError::ReservedIdentifier { .. }
            | ListError::EmptyInput
            | ListError::MissingKey(_)
            | ListError::UnsupportedParameter(_)
            | ListError::InvalidParameter(_)
            | ListError::UnsupportedDriver(_) => StatusCode::BAD_REQUEST,
            ListError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            ListError::Backend(_) => StatusCode::BAD_GATEWAY,
            ListError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the list cache.
pub type Result<T> = std::result::Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ListError::ElementNotFound("e".to_string()), StatusCode::NOT_FOUND),
            (ListError::CollectionNotFound("c".to_string()), StatusCode::NOT_FOUND),
            (ListError::DuplicateElement("e".to_string()), StatusCode::CONFLICT),
            (ListError::CollectionAlreadyExists("c".to_string()), StatusCode::CONFLICT),
            (ListError::EmptyInput, StatusCode::BAD_REQUEST),
            (ListError::UnsupportedParameter("x".to_string()), StatusCode::BAD_REQUEST),
            (ListError::Unsupported("expire".to_string()), StatusCode::NOT_IMPLEMENTED),
            (ListError::Backend("down".to_string()), StatusCode::BAD_GATEWAY),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_reserved_identifier_message() {
        let err = ListError::ReservedIdentifier {
            id: "a:b".to_string(),
            token: ":",
        };
        assert!(err.to_string().contains("a:b"));
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = ListError::CollectionNotFound("fake-list".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(json["error"].as_str().unwrap().contains("fake-list"));
    }
}

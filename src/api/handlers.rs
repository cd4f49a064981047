//! API Handlers
//!
//! HTTP request handlers for each list cache endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::client::{Client, Driver};
use crate::config::Config;
use crate::domain::IndexEntry;
use crate::error::{ListError, Result};
use crate::models::{
    CounterResponse, CreateListRequest, DeleteResponse, ElementResponse, HeadersResponse,
    HealthResponse, ListResponse, PushElementRequest, TtlResponse, UpdateTtlRequest,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// The client and the store it writes to; the store handle is kept for the
/// expiry sweep.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
    pub store: Arc<MemoryStore>,
}

impl AppState {
    /// Creates a new AppState over a fresh store.
    pub fn new(driver: Driver, chunk_size: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let client = Client::new(driver, store.clone(), chunk_size);
        Self {
            client: Arc::new(client),
            store,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.driver, config.chunk_size)
    }
}

/// Handler for POST /lists
pub async fn create_list_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ListResponse>)> {
    let (id, elements) = state.client.create_list(req.elements, &req.options)?;
    Ok((StatusCode::CREATED, Json(ListResponse::new(id.to_string(), elements))))
}

/// Handler for GET /lists/:id
pub async fn get_list_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListResponse>> {
    let elements = state.client.find_list_by_uuid(&id)?;
    if elements.is_empty() {
        return Err(ListError::CollectionNotFound(id));
    }
    Ok(Json(ListResponse::new(id, elements)))
}

/// Handler for DELETE /lists/:id
pub async fn delete_list_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.client.delete(&id)?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for POST /lists/:id/elements
pub async fn push_element_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PushElementRequest>,
) -> Result<(StatusCode, Json<ElementResponse>)> {
    let uuid = state
        .client
        .push_element(&id, req.uuid.as_deref(), req.body.clone())?;
    Ok((StatusCode::CREATED, Json(ElementResponse::new(uuid, req.body))))
}

/// Handler for GET /lists/:id/elements/:eid
pub async fn get_element_handler(
    State(state): State<AppState>,
    Path((id, element)): Path<(String, String)>,
) -> Result<Json<ElementResponse>> {
    let body = state.client.find_element(&id, &element)?;
    Ok(Json(ElementResponse::new(element, body)))
}

/// Handler for PATCH /lists/:id/elements/:eid
///
/// The request body is a JSON object of fields merged into the element.
pub async fn update_element_handler(
    State(state): State<AppState>,
    Path((id, element)): Path<(String, String)>,
    Json(fields): Json<Value>,
) -> Result<Json<ElementResponse>> {
    let Value::Object(fields) = fields else {
        return Err(ListError::InvalidParameter(
            "update body must be an object".to_string(),
        ));
    };

    let body = state.client.update_element(&id, &element, &fields)?;
    Ok(Json(ElementResponse::new(element, body)))
}

/// Handler for DELETE /lists/:id/elements/:eid
pub async fn delete_element_handler(
    State(state): State<AppState>,
    Path((id, element)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    state.client.delete_element(&id, &element)?;
    Ok(Json(DeleteResponse::new(element)))
}

/// Handler for PUT /lists/:id/ttl
pub async fn update_ttl_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTtlRequest>,
) -> Result<Json<TtlResponse>> {
    state.client.update_ttl(&id, req.ttl)?;
    let ttl = state.client.get_ttl(&id)?;
    Ok(Json(TtlResponse::new(id, ttl)))
}

/// Handler for GET /lists/:id/headers
pub async fn headers_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HeadersResponse>> {
    let headers = state.client.get_headers(&id)?;
    Ok(Json(HeadersResponse::new(id, headers)))
}

/// Handler for GET /lists/:id/counter
pub async fn counter_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CounterResponse>> {
    let size = state.client.get_counter(&id)?;
    Ok(Json(CounterResponse::new(id, size)))
}

/// Handler for GET /index
pub async fn index_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, IndexEntry>>> {
    Ok(Json(state.client.get_index()?))
}

/// Handler for GET /index/:id
pub async fn index_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IndexEntry>> {
    Ok(Json(state.client.get_index_entry(&id)?))
}

/// Handler for GET /stats
///
/// Returns the backend's diagnostic statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.client.get_statistics()?))
}

/// Handler for POST /flush
///
/// Clears the whole backend.
pub async fn flush_handler(State(state): State<AppState>) -> Result<StatusCode> {
    state.client.flush()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.client.driver().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn state() -> AppState {
        AppState::new(Driver::Redis, 3)
    }

    fn create_request(uuid: &str, count: usize) -> CreateListRequest {
        let mut options = Map::new();
        options.insert("uuid".to_string(), json!(uuid));
        options.insert("element-uuid".to_string(), json!("id"));
        CreateListRequest {
            elements: (1..=count).map(|i| json!({"id": i, "rate": i})).collect(),
            options,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_list() {
        let state = state();

        let (status, created) =
            create_list_handler(State(state.clone()), Json(create_request("fake-list", 4)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.uuid, "fake-list");

        let response = get_list_handler(State(state), Path("fake-list".to_string()))
            .await
            .unwrap();
        assert_eq!(response.elements.len(), 4);
    }

    #[tokio::test]
    async fn test_get_missing_list() {
        let result = get_list_handler(State(state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ListError::CollectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_empty_list_rejected() {
        let req = CreateListRequest {
            elements: vec![],
            options: Map::new(),
        };
        let result = create_list_handler(State(state()), Json(req)).await;
        assert!(matches!(result, Err(ListError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected_and_list_kept() {
        let state = state();
        create_list_handler(State(state.clone()), Json(create_request("l", 2)))
            .await
            .unwrap();

        let req = UpdateTtlRequest { ttl: Some(0) };
        let result = update_ttl_handler(State(state.clone()), Path("l".to_string()), Json(req)).await;
        assert!(matches!(result, Err(ListError::InvalidParameter(_))));

        let response = get_list_handler(State(state), Path("l".to_string()))
            .await
            .unwrap();
        assert_eq!(response.elements.len(), 2);
    }

    #[tokio::test]
    async fn test_update_element_requires_object() {
        let state = state();
        create_list_handler(State(state.clone()), Json(create_request("l", 2)))
            .await
            .unwrap();

        let path = Path(("l".to_string(), "1".to_string()));
        let result = update_element_handler(State(state.clone()), path, Json(json!(5))).await;
        assert!(matches!(result, Err(ListError::InvalidParameter(_))));

        let path = Path(("l".to_string(), "1".to_string()));
        let response = update_element_handler(State(state), path, Json(json!({"rate": 9})))
            .await
            .unwrap();
        assert_eq!(response.body, json!({"id": 1, "rate": 9}));
    }

    #[tokio::test]
    async fn test_delete_element_and_counter() {
        let state = state();
        create_list_handler(State(state.clone()), Json(create_request("l", 4)))
            .await
            .unwrap();

        delete_element_handler(State(state.clone()), Path(("l".to_string(), "4".to_string())))
            .await
            .unwrap();

        let counter = counter_handler(State(state), Path("l".to_string()))
            .await
            .unwrap();
        assert_eq!(counter.size, 3);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.driver, "redis");
    }
}

//! API Routes
//!
//! Configures the Axum router with all list cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    counter_handler, create_list_handler, delete_element_handler, delete_list_handler,
    flush_handler, get_element_handler, get_list_handler, headers_handler, health_handler,
    index_entry_handler, index_handler, push_element_handler, stats_handler,
    update_element_handler, update_ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/lists", post(create_list_handler))
        .route("/lists/:id", get(get_list_handler).delete(delete_list_handler))
        .route("/lists/:id/elements", post(push_element_handler))
        .route(
            "/lists/:id/elements/:element",
            get(get_element_handler)
                .patch(update_element_handler)
                .delete(delete_element_handler),
        )
        .route("/lists/:id/ttl", put(update_ttl_handler))
        .route("/lists/:id/headers", get(headers_handler))
        .route("/lists/:id/counter", get(counter_handler))
        .route("/index", get(index_handler))
        .route("/index/:id", get(index_entry_handler))
        .route("/stats", get(stats_handler))
        .route("/flush", post(flush_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

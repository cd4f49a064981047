//! API Module
//!
//! HTTP handlers and routing for the list cache REST API.
//!
//! # Endpoints
//! - `POST /lists` - Create a list
//! - `GET|DELETE /lists/:id` - Read or drop a whole list
//! - `POST /lists/:id/elements` - Append an element
//! - `GET|PATCH|DELETE /lists/:id/elements/:element` - Work on one element
//! - `PUT /lists/:id/ttl` - Change a list TTL
//! - `GET /lists/:id/headers` - List headers
//! - `GET /lists/:id/counter` - Element count
//! - `GET /index`, `GET /index/:id` - Index entries
//! - `GET /stats` - Backend statistics
//! - `POST /flush` - Clear the backend
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

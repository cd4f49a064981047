//! Request and Response models for the list cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateListRequest, PushElementRequest, UpdateTtlRequest};
pub use responses::{
    CounterResponse, DeleteResponse, ElementResponse, ErrorResponse, HeadersResponse,
    HealthResponse, ListResponse, TtlResponse,
};

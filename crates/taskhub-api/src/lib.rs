//! # taskhub-api
//!
//! HTTP API layer for TaskHub built on Axum.
//!
//! Provides the REST endpoints, the WebSocket upgrade, middleware (request
//! logging, CORS), the authenticated-user extractor, DTOs, and the router
//! that ties them to [`AppState`].

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

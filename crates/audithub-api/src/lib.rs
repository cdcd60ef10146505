//! # audithub-api
//!
//! HTTP API layer: Axum routes, middleware, extractors, and DTOs for
//! the AuditHub authentication service.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use state::AppState;

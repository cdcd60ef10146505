//! HTTP middleware: CORS and permission guards.

pub mod cors;
pub mod rbac;

pub use cors::build_cors_layer;
pub use rbac::{require_all_permissions, require_any_permissions, require_permission};

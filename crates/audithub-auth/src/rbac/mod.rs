//! Layered permission resolution.

pub mod resolver;

pub use resolver::{PermissionResolver, PermissionSource};

//! # audithub-core
//!
//! Shared foundation for the AuditHub platform: the unified error type,
//! configuration schemas, audit event definitions, and the traits that
//! decouple the authentication core from its collaborators.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;

//! Domain events emitted by AuditHub operations.
//!
//! Currently only authentication events are defined; they are consumed by
//! the audit sink so that every login, logout, and password change leaves
//! a trail regardless of outcome.

pub mod auth;

pub use auth::{AuditAction, AuditOutcome, AuthEvent};

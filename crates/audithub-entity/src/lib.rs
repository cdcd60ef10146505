//! # audithub-entity
//!
//! Domain entity models for AuditHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod firm;
pub mod rbac;
pub mod token;
pub mod user;

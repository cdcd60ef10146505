//! # audithub-database
//!
//! PostgreSQL connection management and concrete implementations of the
//! persistence traits the session and permission layers consume.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

//! Session lifecycle management and stale-token sweeping.

pub mod manager;
pub mod sweeper;

pub use manager::{LoginResult, SessionManager};
pub use sweeper::TokenSweeper;

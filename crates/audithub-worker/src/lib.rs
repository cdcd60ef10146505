//! # audithub-worker
//!
//! Scheduled background maintenance: the periodic stale-session sweep.

pub mod scheduler;

pub use scheduler::CronScheduler;

//! Core traits defined in `audithub-core` and implemented by other crates.

pub mod audit;
pub mod clock;

pub use audit::AuditSink;
pub use clock::{Clock, SystemClock};

//! Injectable time source.
//!
//! The session manager and the stale-token sweeper never call `Utc::now()`
//! directly; they read the clock they were constructed with, which lets
//! tests drive lockout expiry and heartbeat staleness deterministically.

use chrono::{DateTime, Utc};

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

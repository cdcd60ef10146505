//! Session heartbeat and stale-token sweep configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes without a heartbeat before a token is considered stale.
    #[serde(default = "default_stale_threshold")]
    pub stale_threshold_minutes: u64,
    /// Interval between stale-token sweeps in minutes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stale_threshold_minutes: default_stale_threshold(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

fn default_stale_threshold() -> u64 {
    5
}

fn default_sweep_interval() -> u64 {
    2
}

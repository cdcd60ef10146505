//! Stale session sweep.
//!
//! A session whose heartbeat has gone quiet for longer than the
//! configured threshold is considered abandoned and its refresh token
//! is revoked, freeing the (user, tool) slot for a fresh login.

use std::sync::Arc;

use tracing::info;

use audithub_core::config::session::SessionConfig;
use audithub_core::error::AppError;
use audithub_core::traits::Clock;

use crate::store::TokenStore;

/// Revokes refresh tokens whose last activity is older than the stale
/// threshold.
#[derive(Clone)]
pub struct TokenSweeper {
    /// Refresh token persistence.
    tokens: Arc<dyn TokenStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Idle duration after which a session counts as stale.
    stale_threshold: chrono::Duration,
}

impl std::fmt::Debug for TokenSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSweeper")
            .field("stale_threshold", &self.stale_threshold)
            .finish()
    }
}

impl TokenSweeper {
    /// Creates a new sweeper from session configuration.
    pub fn new(tokens: Arc<dyn TokenStore>, clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            tokens,
            clock,
            stale_threshold: chrono::Duration::minutes(config.stale_threshold_minutes as i64),
        }
    }

    /// Runs one sweep cycle, revoking every stale active token in a
    /// single bulk update. Returns the number of tokens revoked.
    ///
    /// Sweeping is idempotent: a token revoked by one cycle is ignored
    /// by the next.
    pub async fn run_sweep(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        let idle_cutoff = now - self.stale_threshold;

        let revoked = self.tokens.revoke_stale(now, idle_cutoff).await?;

        if revoked > 0 {
            info!(revoked = revoked, "Stale session sweep revoked tokens");
        }

        Ok(revoked)
    }
}

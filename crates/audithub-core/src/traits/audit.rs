//! Audit sink trait.

use async_trait::async_trait;

use crate::events::AuthEvent;
use crate::result::AppResult;

/// Persists authentication audit events.
///
/// Callers treat recording as fire-and-forget: a sink failure is logged at
/// the call site and never propagated, so a broken audit store cannot block
/// authentication.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record a single audit event.
    async fn record(&self, event: AuthEvent) -> AppResult<()>;
}

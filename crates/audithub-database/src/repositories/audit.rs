//! Audit trail sink implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use audithub_core::error::{AppError, ErrorKind};
use audithub_core::events::AuthEvent;
use audithub_core::result::AppResult;
use audithub_core::traits::AuditSink;

/// Repository that appends auth events to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for AuditRepository {
    async fn record(&self, event: AuthEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_events \
                 (user_id, firm_id, action, outcome, error, details, ip_address, user_agent, occurred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(event.user_id)
        .bind(event.firm_id)
        .bind(event.action.as_str())
        .bind(event.outcome.as_str())
        .bind(&event.error)
        .bind(&event.details)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record audit event", e))?;
        Ok(())
    }
}

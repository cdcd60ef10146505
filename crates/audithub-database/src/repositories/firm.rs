//! Firm policy store implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use audithub_auth::store::FirmStore;
use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_entity::firm::FirmPolicy;

/// Repository for firm settings and policy lookup.
#[derive(Debug, Clone)]
pub struct FirmRepository {
    pool: PgPool,
}

impl FirmRepository {
    /// Create a new firm repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FirmStore for FirmRepository {
    async fn load_policy(&self, firm_id: Uuid) -> AppResult<FirmPolicy> {
        let settings: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT settings FROM firms WHERE id = $1")
                .bind(firm_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load firm settings", e)
                })?;

        // An unknown firm yields an empty policy, denying every action.
        Ok(settings
            .map(|s| FirmPolicy::from_settings(&s))
            .unwrap_or_default())
    }
}

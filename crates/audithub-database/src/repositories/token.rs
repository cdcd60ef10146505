//! Refresh token store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use audithub_auth::store::TokenStore;
use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_entity::token::{ApplicationType, NewRefreshToken, RefreshToken};

/// Repository for refresh token persistence.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn create(&self, token: NewRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens \
                 (user_id, token, application, expires_at, ip_address, user_agent, last_activity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(token.user_id)
        .bind(&token.token)
        .bind(token.application)
        .bind(token.expires_at)
        .bind(&token.ip_address)
        .bind(&token.user_agent)
        .bind(token.last_activity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create refresh token", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        application: ApplicationType,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens \
             WHERE user_id = $1 AND application = $2 \
               AND is_revoked = FALSE AND expires_at > $3 \
             ORDER BY last_activity DESC \
             LIMIT 1",
        )
        .bind(user_id)
        .bind(application)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active token", e))
    }

    async fn touch_activity(&self, token_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE refresh_tokens SET last_activity = $2 WHERE id = $1")
            .bind(token_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update token activity", e)
            })?;
        Ok(())
    }

    async fn revoke(&self, token_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE, revoked_at = $2 \
             WHERE id = $1 AND is_revoked = FALSE",
        )
        .bind(token_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE, revoked_at = $2 \
             WHERE user_id = $1 AND is_revoked = FALSE",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn revoke_stale(&self, now: DateTime<Utc>, idle_cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE, revoked_at = $1 \
             WHERE is_revoked = FALSE AND expires_at > $1 AND last_activity < $2",
        )
        .bind(now)
        .bind(idle_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke stale tokens", e)
        })?;

        Ok(result.rows_affected())
    }
}

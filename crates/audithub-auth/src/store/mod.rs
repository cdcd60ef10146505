//! Persistence traits consumed by the session and permission layers.
//!
//! The session manager and permission resolver depend on these traits
//! rather than on a concrete database, so production wires in the sqlx
//! repositories while tests use the in-memory implementations from
//! [`memory`].

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use audithub_core::error::AppError;
use audithub_entity::firm::FirmPolicy;
use audithub_entity::rbac::UserGrants;
use audithub_entity::token::{ApplicationType, NewRefreshToken, RefreshToken};
use audithub_entity::user::User;

/// User account lookup and login-state bookkeeping.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Looks up a user by ID.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Records a failed login attempt, optionally locking the account.
    async fn record_failed_login(
        &self,
        user_id: Uuid,
        failed_attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;

    /// Records a successful login: resets the failure counter, clears
    /// any lock, and stamps `last_login`.
    async fn record_successful_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Replaces the stored password hash.
    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

/// Refresh token persistence.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a newly issued refresh token.
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken, AppError>;

    /// Looks up a token row by its opaque token string.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Finds the most recently active valid token for a user on a
    /// given application, if any.
    async fn find_active(
        &self,
        user_id: Uuid,
        application: ApplicationType,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AppError>;

    /// Updates the last-activity timestamp of a token.
    async fn touch_activity(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Revokes a single token. Revoking an already revoked token is a
    /// no-op.
    async fn revoke(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Revokes every active token belonging to a user, across all
    /// applications. Returns the number of tokens revoked.
    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, AppError>;

    /// Revokes every active token whose last activity is strictly
    /// before `idle_cutoff`. Returns the number of tokens revoked.
    async fn revoke_stale(
        &self,
        now: DateTime<Utc>,
        idle_cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError>;
}

/// Role and custom permission grant lookup.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Loads the full grant set for a user: every assigned role with
    /// its permissions, plus direct custom permissions.
    async fn load_grants(&self, user_id: Uuid) -> Result<UserGrants, AppError>;
}

/// Firm-level policy lookup.
#[async_trait]
pub trait FirmStore: Send + Sync {
    /// Loads the action policy table from the firm's settings.
    async fn load_policy(&self, firm_id: Uuid) -> Result<FirmPolicy, AppError>;
}

//! In-memory store implementations using Tokio locks.
//!
//! Suitable for tests and single-node development. Production uses the
//! sqlx-backed repositories instead.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use audithub_core::error::AppError;
use audithub_core::events::AuthEvent;
use audithub_core::traits::{AuditSink, Clock};
use audithub_entity::firm::FirmPolicy;
use audithub_entity::rbac::UserGrants;
use audithub_entity::token::{ApplicationType, NewRefreshToken, RefreshToken};
use audithub_entity::user::User;

use super::{FirmStore, PermissionStore, TokenStore, UserStore};

/// In-memory user store backed by a Tokio RwLock.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Returns a snapshot of a user, for test assertions.
    pub async fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.read().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn record_failed_login(
        &self,
        user_id: Uuid,
        failed_attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.failed_login_attempts = failed_attempts;
            user.locked_until = locked_until;
        }
        Ok(())
    }

    async fn record_successful_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.failed_login_attempts = 0;
            user.locked_until = None;
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.password_hash = password_hash.to_string();
            user.password_changed_at = Some(changed_at);
            user.must_change_password = false;
            user.updated_at = changed_at;
        }
        Ok(())
    }
}

/// In-memory refresh token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<Uuid, RefreshToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of a token row, for test assertions.
    pub async fn get(&self, token_id: Uuid) -> Option<RefreshToken> {
        self.tokens.read().await.get(&token_id).cloned()
    }

    /// Counts valid tokens for a user across all applications.
    pub async fn active_count(&self, user_id: Uuid, now: DateTime<Utc>) -> usize {
        let tokens = self.tokens.read().await;
        tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_valid(now))
            .count()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken, AppError> {
        let row = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token: token.token,
            application: token.application,
            expires_at: token.expires_at,
            is_revoked: false,
            revoked_at: None,
            ip_address: token.ip_address,
            user_agent: token.user_agent,
            last_activity: token.last_activity,
            created_at: token.last_activity,
        };
        self.tokens.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.token == token).cloned())
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        application: ApplicationType,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AppError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.application == application && t.is_valid(now))
            .max_by_key(|t| t.last_activity)
            .cloned())
    }

    async fn touch_activity(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get_mut(&token_id) {
            token.last_activity = at;
        }
        Ok(())
    }

    async fn revoke(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get_mut(&token_id)
            && !token.is_revoked
        {
            token.is_revoked = true;
            token.revoked_at = Some(at);
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, AppError> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.is_revoked {
                token.is_revoked = true;
                token.revoked_at = Some(at);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn revoke_stale(
        &self,
        now: DateTime<Utc>,
        idle_cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens.values_mut() {
            if !token.is_revoked && token.expires_at > now && token.last_activity < idle_cutoff {
                token.is_revoked = true;
                token.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

/// In-memory permission grant store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPermissionStore {
    grants: Arc<RwLock<HashMap<Uuid, UserGrants>>>,
}

impl MemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, grants: UserGrants) {
        self.grants.write().await.insert(grants.user_id, grants);
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn load_grants(&self, user_id: Uuid) -> Result<UserGrants, AppError> {
        let grants = self.grants.read().await;
        Ok(grants
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserGrants::empty(user_id)))
    }
}

/// In-memory firm policy store.
#[derive(Debug, Clone, Default)]
pub struct MemoryFirmStore {
    policies: Arc<RwLock<HashMap<Uuid, FirmPolicy>>>,
}

impl MemoryFirmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, firm_id: Uuid, policy: FirmPolicy) {
        self.policies.write().await.insert(firm_id, policy);
    }
}

#[async_trait]
impl FirmStore for MemoryFirmStore {
    async fn load_policy(&self, firm_id: Uuid) -> Result<FirmPolicy, AppError> {
        let policies = self.policies.read().await;
        Ok(policies.get(&firm_id).cloned().unwrap_or_default())
    }
}

/// Test clock whose current time is set and advanced by hand.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(std::sync::Mutex::new(start)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = *now + duration;
    }

    /// Sets the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().expect("clock mutex poisoned") = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

/// Audit sink that buffers events in memory, for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuthEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded(&self) -> Vec<AuthEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuthEvent) -> Result<(), AppError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

//! Shared test fixtures: an in-memory session stack with a manual clock.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use audithub_auth::jwt::{JwtDecoder, JwtEncoder};
use audithub_auth::password::PasswordHasher;
use audithub_auth::session::{SessionManager, TokenSweeper};
use audithub_auth::store::memory::{
    ManualClock, MemoryAuditSink, MemoryTokenStore, MemoryUserStore,
};
use audithub_core::config::auth::AuthConfig;
use audithub_core::config::session::SessionConfig;
use audithub_entity::token::ApplicationType;
use audithub_entity::user::{SeniorityType, User};

/// Password every fixture user is created with.
pub const PASSWORD: &str = "Correct1Pass";

pub struct TestHarness {
    pub users: Arc<MemoryUserStore>,
    pub tokens: Arc<MemoryTokenStore>,
    pub clock: Arc<ManualClock>,
    pub audit: Arc<MemoryAuditSink>,
    pub hasher: Arc<PasswordHasher>,
    pub manager: SessionManager,
    pub sweeper: TokenSweeper,
}

impl TestHarness {
    pub fn new() -> Self {
        // Low bcrypt cost keeps the suite fast.
        let config = AuthConfig {
            access_secret: "test-access-secret-0123456789abcdef".into(),
            refresh_secret: "test-refresh-secret-fedcba9876543210".into(),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };

        let users = Arc::new(MemoryUserStore::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
        ));
        let audit = Arc::new(MemoryAuditSink::new());
        let hasher = Arc::new(PasswordHasher::new(&config));

        let manager = SessionManager::new(
            users.clone(),
            tokens.clone(),
            Arc::new(JwtEncoder::new(&config)),
            Arc::new(JwtDecoder::new(&config, clock.clone())),
            hasher.clone(),
            clock.clone(),
            audit.clone(),
            config,
        );

        let sweeper = TokenSweeper::new(tokens.clone(), clock.clone(), &SessionConfig::default());

        Self {
            users,
            tokens,
            clock,
            audit,
            hasher,
            manager,
            sweeper,
        }
    }

    /// Creates an active user with no tool restrictions.
    pub async fn create_user(&self, email: &str) -> User {
        self.create_user_with_tools(email, None).await
    }

    /// Creates an active user restricted to the given tools.
    pub async fn create_user_with_tools(
        &self,
        email: &str,
        allowed_tools: Option<Vec<ApplicationType>>,
    ) -> User {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let user = User {
            id: Uuid::new_v4(),
            firm_id: Uuid::new_v4(),
            user_name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash_password(PASSWORD).unwrap(),
            seniority: SeniorityType::Associate,
            is_active: true,
            must_change_password: false,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            password_changed_at: None,
            allowed_tools: allowed_tools.map(sqlx::types::Json),
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.clone()).await;
        user
    }
}

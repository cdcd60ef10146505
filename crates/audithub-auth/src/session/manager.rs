//! Session lifecycle manager — login, refresh, logout, password change.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;
use audithub_core::events::{AuditAction, AuthEvent};
use audithub_core::traits::{AuditSink, Clock};
use audithub_entity::token::{ApplicationType, NewRefreshToken};
use audithub_entity::user::User;

use crate::jwt::{AccessClaims, JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::{TokenStore, UserStore};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Signed access token.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Refresh token expiry.
    pub refresh_expires_at: DateTime<Utc>,
    /// Whether the user must change their password before proceeding.
    pub must_change_password: bool,
}

/// Manages the complete session lifecycle.
///
/// All time arithmetic goes through the injected [`Clock`] so tests can
/// drive lockout expiry and token staleness deterministically.
#[derive(Clone)]
pub struct SessionManager {
    /// User account persistence.
    users: Arc<dyn UserStore>,
    /// Refresh token persistence.
    tokens: Arc<dyn TokenStore>,
    /// JWT encoder for token generation.
    encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    decoder: Arc<JwtDecoder>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy validator.
    validator: PasswordValidator,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Audit event sink.
    audit: Arc<dyn AuditSink>,
    /// Auth configuration.
    auth_config: AuthConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("auth_config", &self.auth_config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        hasher: Arc<PasswordHasher>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
        auth_config: AuthConfig,
    ) -> Self {
        let validator = PasswordValidator::new(&auth_config);
        Self {
            users,
            tokens,
            encoder,
            decoder,
            hasher,
            validator,
            clock,
            audit,
            auth_config,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Find the user by email
    /// 2. Check lockout and active status
    /// 3. Verify the password, counting failures toward lockout
    /// 4. Enforce one active session per (user, tool)
    /// 5. Check the user may access the requested tool (restricted
    ///    tools only; the main portal and onboarding are open)
    /// 6. Issue tokens and persist the refresh token row
    ///
    /// Failed lookups and failed password checks both surface as
    /// `InvalidCredentials` so the response never reveals whether the
    /// email exists.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        application: ApplicationType,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<LoginResult, AppError> {
        let now = self.clock.now();

        // Step 1: Find user
        let Some(user) = self.users.find_by_email(email).await? else {
            self.record_audit(
                AuthEvent::failure(None, None, AuditAction::Login, "Unknown email")
                    .with_origin(ip_address, user_agent),
            )
            .await;
            return Err(AppError::invalid_credentials());
        };

        // Step 2: Check lockout and active status
        if user.is_locked(now) {
            self.audit_login_failure(&user, "Account locked", &ip_address, &user_agent)
                .await;
            return Err(AppError::account_locked(
                "Account is locked due to too many failed login attempts",
            ));
        }

        if !user.is_active {
            self.audit_login_failure(&user, "Account inactive", &ip_address, &user_agent)
                .await;
            return Err(AppError::account_inactive("Account is deactivated"));
        }

        // Step 3: Verify password
        if !self.hasher.verify_password(password, &user.password_hash)? {
            let err = self.handle_failed_attempt(&user, now).await?;
            self.audit_login_failure(&user, "Invalid password", &ip_address, &user_agent)
                .await;
            return Err(err);
        }

        // Step 4: One active session per (user, tool)
        if application.enforces_single_session()
            && let Some(existing) = self.tokens.find_active(user.id, application, now).await?
        {
            warn!(
                user_id = %user.id,
                application = %application,
                token_id = %existing.id,
                "Login rejected, active session already exists"
            );
            self.audit_login_failure(&user, "Session conflict", &ip_address, &user_agent)
                .await;
            return Err(AppError::session_conflict(
                "An active session already exists for this tool",
            ));
        }

        // Step 5: Tool access applies to restricted tools only
        if application.is_restricted() && !user.can_access_tool(application) {
            self.audit_login_failure(&user, "Tool access denied", &ip_address, &user_agent)
                .await;
            return Err(AppError::tool_access_denied(format!(
                "User does not have access to the {application} tool"
            )));
        }

        // Step 6: Issue tokens
        let (access_token, access_expires_at) = self.encoder.sign_access(&user, now)?;
        let (refresh_token, refresh_expires_at) = self.encoder.sign_refresh(user.id, now)?;

        let row = self
            .tokens
            .create(NewRefreshToken {
                user_id: user.id,
                token: refresh_token.clone(),
                application,
                expires_at: refresh_expires_at,
                ip_address: ip_address.clone(),
                user_agent: user_agent.clone(),
                last_activity: now,
            })
            .await?;

        self.users.record_successful_login(user.id, now).await?;

        info!(
            user_id = %user.id,
            application = %application,
            token_id = %row.id,
            "Login successful"
        );

        self.record_audit(
            AuthEvent::success(user.id, user.firm_id, AuditAction::Login)
                .with_details(serde_json::json!({ "application": application }))
                .with_origin(ip_address, user_agent),
        )
        .await;

        let must_change_password = user.must_change_password;

        Ok(LoginResult {
            user,
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
            must_change_password,
        })
    }

    /// Issues a new access token for a valid refresh token.
    ///
    /// The refresh token is not rotated; its activity timestamp is
    /// updated so the sweep sees the session as live.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();

        let claims = self.decoder.decode_refresh(refresh_token)?;

        let row = self
            .tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::invalid_token("Refresh token not recognized"))?;

        if !row.is_valid(now) {
            return Err(AppError::invalid_token(
                "Refresh token has been revoked or expired",
            ));
        }

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::invalid_token("Refresh token not recognized"))?;

        if !user.is_active {
            return Err(AppError::account_inactive("Account is deactivated"));
        }

        self.tokens.touch_activity(row.id, now).await?;

        let (access_token, expires_at) = self.encoder.sign_access(&user, now)?;

        self.record_audit(AuthEvent::success(
            user.id,
            user.firm_id,
            AuditAction::RefreshToken,
        ))
        .await;

        Ok((access_token, expires_at))
    }

    /// Revokes the session identified by a refresh token.
    ///
    /// Idempotent: unknown or already revoked tokens succeed silently.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let now = self.clock.now();

        let Some(row) = self.tokens.find_by_token(refresh_token).await? else {
            return Ok(());
        };

        if !row.is_revoked {
            self.tokens.revoke(row.id, now).await?;
            info!(
                user_id = %row.user_id,
                application = %row.application,
                token_id = %row.id,
                "Session revoked on logout"
            );

            if let Some(user) = self.users.find_by_id(row.user_id).await? {
                self.record_audit(AuthEvent::success(user.id, user.firm_id, AuditAction::Logout))
                    .await;
            }
        }

        Ok(())
    }

    /// Changes a user's password and revokes all their sessions.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let now = self.clock.now();

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self
            .hasher
            .verify_password(old_password, &user.password_hash)?
        {
            self.record_audit(AuthEvent::failure(
                Some(user.id),
                Some(user.firm_id),
                AuditAction::ChangePassword,
                "Old password incorrect",
            ))
            .await;
            return Err(AppError::invalid_old_password());
        }

        self.validator.validate_not_same(old_password, new_password)?;
        self.validator.validate(new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash, now).await?;

        // Every outstanding session dies with the old password.
        let revoked = self.tokens.revoke_all_for_user(user_id, now).await?;

        info!(
            user_id = %user_id,
            sessions_revoked = revoked,
            "Password changed"
        );

        self.record_audit(AuthEvent::success(
            user.id,
            user.firm_id,
            AuditAction::ChangePassword,
        ))
        .await;

        Ok(())
    }

    /// Marks the user's session on a tool as active right now.
    ///
    /// Heartbeats are advisory. Failures are logged and swallowed so a
    /// storage hiccup never turns an authenticated request into an
    /// error.
    pub async fn update_token_heartbeat(&self, user_id: Uuid, application: ApplicationType) {
        let now = self.clock.now();

        let result = async {
            if let Some(row) = self.tokens.find_active(user_id, application, now).await? {
                self.tokens.touch_activity(row.id, now).await?;
            }
            Ok::<(), AppError>(())
        }
        .await;

        if let Err(e) = result {
            warn!(
                user_id = %user_id,
                application = %application,
                error = %e,
                "Failed to update session heartbeat"
            );
        }
    }

    /// Validates an access token and returns its claims.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        self.decoder.decode_access(token)
    }

    /// Increments the failure counter and locks the account when the
    /// configured threshold is reached. Returns the error to surface.
    async fn handle_failed_attempt(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<AppError, AppError> {
        let attempts = user.failed_login_attempts + 1;

        if attempts >= self.auth_config.max_failed_attempts {
            let locked_until =
                now + Duration::minutes(self.auth_config.lockout_duration_minutes as i64);
            self.users
                .record_failed_login(user.id, attempts, Some(locked_until))
                .await?;

            warn!(
                user_id = %user.id,
                attempts = attempts,
                locked_until = %locked_until,
                "Account locked after repeated login failures"
            );

            return Ok(AppError::account_locked(
                "Account locked due to too many failed login attempts",
            ));
        }

        self.users
            .record_failed_login(user.id, attempts, None)
            .await?;

        Ok(AppError::invalid_credentials())
    }

    async fn audit_login_failure(
        &self,
        user: &User,
        reason: &str,
        ip_address: &Option<String>,
        user_agent: &Option<String>,
    ) {
        self.record_audit(
            AuthEvent::failure(Some(user.id), Some(user.firm_id), AuditAction::Login, reason)
                .with_origin(ip_address.clone(), user_agent.clone()),
        )
        .await;
    }

    /// Records an audit event, swallowing sink failures.
    async fn record_audit(&self, event: AuthEvent) {
        if let Err(e) = self.audit.record(event).await {
            warn!(error = %e, "Failed to record audit event");
        }
    }
}

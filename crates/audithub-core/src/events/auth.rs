//! Authentication audit events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authentication action an audit event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A login attempt.
    Login,
    /// A logout (refresh token revocation).
    Logout,
    /// A password change.
    ChangePassword,
    /// An access token refresh.
    RefreshToken,
}

impl AuditAction {
    /// Stable wire/storage name for the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::ChangePassword => "CHANGE_PASSWORD",
            Self::RefreshToken => "REFRESH_TOKEN",
        }
    }
}

/// Whether the audited operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    /// The operation succeeded.
    Success,
    /// The operation failed; `error` carries the reason.
    Failure,
}

impl AuditOutcome {
    /// Stable wire/storage name for the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

/// An audit trail record emitted by the session manager.
///
/// Failed login attempts against unknown emails carry no `user_id`; the
/// attempted email is preserved in `details` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// The user the event concerns, when known.
    pub user_id: Option<Uuid>,
    /// The user's firm, when known.
    pub firm_id: Option<Uuid>,
    /// What happened.
    pub action: AuditAction,
    /// Success or failure.
    pub outcome: AuditOutcome,
    /// Failure reason, if any.
    pub error: Option<String>,
    /// Free-form structured context (attempted email, tool tag, ...).
    pub details: serde_json::Value,
    /// Originating IP address, when known.
    pub ip_address: Option<String>,
    /// Originating user agent, when known.
    pub user_agent: Option<String>,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl AuthEvent {
    /// Create a success event.
    pub fn success(user_id: Uuid, firm_id: Uuid, action: AuditAction) -> Self {
        Self {
            user_id: Some(user_id),
            firm_id: Some(firm_id),
            action,
            outcome: AuditOutcome::Success,
            error: None,
            details: serde_json::Value::Null,
            ip_address: None,
            user_agent: None,
            occurred_at: Utc::now(),
        }
    }

    /// Create a failure event.
    pub fn failure(
        user_id: Option<Uuid>,
        firm_id: Option<Uuid>,
        action: AuditAction,
        error: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            firm_id,
            action,
            outcome: AuditOutcome::Failure,
            error: Some(error.into()),
            details: serde_json::Value::Null,
            ip_address: None,
            user_agent: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attach request origin metadata.
    pub fn with_origin(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

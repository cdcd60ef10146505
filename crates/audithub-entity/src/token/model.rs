//! Refresh token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::application::ApplicationType;

/// A persisted refresh token — one row per session.
///
/// The `last_activity` column doubles as the session heartbeat: it is
/// touched on every authenticated request and read by the stale-token
/// sweep. Revocation is monotonic; a revoked token never becomes valid
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique token record identifier.
    pub id: Uuid,
    /// The user this token belongs to.
    pub user_id: Uuid,
    /// The opaque signed token string (unique).
    pub token: String,
    /// The tool context this session was opened for.
    pub application: ApplicationType,
    /// Hard expiry; the token is never valid past this instant.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked.
    pub is_revoked: bool,
    /// When the token was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
    /// IP address the session was opened from.
    pub ip_address: Option<String>,
    /// User-Agent header of the issuing login.
    pub user_agent: Option<String>,
    /// Heartbeat timestamp; updated on every authenticated request.
    pub last_activity: DateTime<Utc>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Check the validity invariant as of the given instant.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// Data required to persist a newly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRefreshToken {
    /// The owning user.
    pub user_id: Uuid,
    /// The signed token string.
    pub token: String,
    /// The tool context being logged in to.
    pub application: ApplicationType,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Issuing IP address.
    pub ip_address: Option<String>,
    /// Issuing user agent.
    pub user_agent: Option<String>,
    /// Initial heartbeat timestamp (the login instant).
    pub last_activity: DateTime<Utc>,
}

//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use audithub_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Whether the user must change their password before proceeding.
    pub must_change_password: bool,
    /// User info.
    pub user: UserResponse,
}

/// Token refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// The user's firm.
    pub firm_id: Uuid,
    /// Display name.
    pub user_name: String,
    /// Email.
    pub email: String,
    /// Seniority.
    pub seniority: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Last login.
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            firm_id: user.firm_id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            seniority: user.seniority.to_string(),
            is_active: user.is_active,
            last_login: user.last_login,
        }
    }
}

/// Effective permission listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsResponse {
    /// Role names held by the user.
    pub roles: Vec<String>,
    /// Sorted effective permission names.
    pub permissions: Vec<String>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

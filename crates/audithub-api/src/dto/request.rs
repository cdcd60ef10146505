//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use audithub_entity::token::ApplicationType;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// The tool being logged in to. Defaults to the main portal.
    #[serde(default)]
    pub application: ApplicationType,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token identifying the session to revoke.
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    /// New password.
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

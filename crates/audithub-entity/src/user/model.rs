//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::token::ApplicationType;

use super::seniority::SeniorityType;

/// A staff member of an audit firm.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// The firm this user belongs to (tenant boundary).
    pub firm_id: Uuid,
    /// Human-readable display name.
    pub user_name: String,
    /// Unique email address used for login.
    pub email: String,
    /// Bcrypt password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Organizational seniority level.
    pub seniority: SeniorityType,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Force password change on next login.
    pub must_change_password: bool,
    /// Number of consecutive failed login attempts.
    #[serde(skip_serializing)]
    pub failed_login_attempts: i32,
    /// Account locked until this time (if locked).
    #[serde(skip_serializing)]
    pub locked_until: Option<DateTime<Utc>>,
    /// Last successful login time.
    pub last_login: Option<DateTime<Utc>>,
    /// When the password was last changed.
    pub password_changed_at: Option<DateTime<Utc>>,
    /// Tools this user may log in to. `None` means unrestricted.
    pub allowed_tools: Option<Json<Vec<ApplicationType>>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is locked as of the given instant.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Check whether this user may log in to the given tool.
    ///
    /// `None` allowed_tools means unrestricted. An explicit grant of the
    /// main application is treated as all-access.
    pub fn can_access_tool(&self, tool: ApplicationType) -> bool {
        match &self.allowed_tools {
            None => true,
            Some(Json(tools)) => {
                tools.contains(&tool) || tools.contains(&ApplicationType::Main)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(allowed: Option<Vec<ApplicationType>>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            firm_id: Uuid::new_v4(),
            user_name: "Jane Auditor".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            seniority: SeniorityType::Associate,
            is_active: true,
            must_change_password: false,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            password_changed_at: None,
            allowed_tools: allowed.map(Json),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_null_allowed_tools_is_unrestricted() {
        assert!(user(None).can_access_tool(ApplicationType::Sampling));
    }

    #[test]
    fn test_main_grant_covers_all_tools() {
        let u = user(Some(vec![ApplicationType::Main]));
        assert!(u.can_access_tool(ApplicationType::Confirmation));
        assert!(u.can_access_tool(ApplicationType::Sampling));
    }

    #[test]
    fn test_specific_grant_is_scoped() {
        let u = user(Some(vec![ApplicationType::Confirmation]));
        assert!(u.can_access_tool(ApplicationType::Confirmation));
        assert!(!u.can_access_tool(ApplicationType::Sampling));
    }

    #[test]
    fn test_lock_expiry() {
        let mut u = user(None);
        let now = Utc::now();
        u.locked_until = Some(now + chrono::Duration::minutes(5));
        assert!(u.is_locked(now));
        assert!(!u.is_locked(now + chrono::Duration::minutes(6)));
    }
}

//! Firm entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An audit firm — the tenant boundary of the system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Firm {
    /// Unique firm identifier.
    pub id: Uuid,
    /// Firm display name.
    pub name: String,
    /// Whether the tenant is active.
    pub is_active: bool,
    /// Firm-level policy document mapping action names to
    /// `{allowed_roles, custom_users}` rules.
    pub settings: serde_json::Value,
    /// When the firm was created.
    pub created_at: DateTime<Utc>,
    /// When the firm was last updated.
    pub updated_at: DateTime<Utc>,
}

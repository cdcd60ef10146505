//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A firm-scoped named bundle of permissions (e.g. Partner, Manager).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// The firm this role belongs to.
    pub firm_id: Uuid,
    /// Role name, unique within the firm.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Hierarchy level; higher values mean more authority.
    pub hierarchy_level: i32,
    /// Default roles are seeded at firm creation and cannot be deleted.
    pub is_default: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named capability (e.g. `create_engagement`).
///
/// Permissions attach to a user either through role membership or as a
/// direct custom grant; both paths only ever add capability.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Capability name, globally unique.
    pub name: String,
    /// Grouping category for admin UIs (e.g. "engagement", "client").
    pub category: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}

//! Firm-level policy document.
//!
//! Firms can gate coarse actions (e.g. `create_engagement`) through a
//! configurable JSON document instead of the fixed permission catalog.
//! The resolver consults this layer only after the primary role/custom
//! permission lookup comes back negative.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One policy entry: who may perform a single action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Role names allowed to perform the action.
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    /// Users granted the action individually.
    #[serde(default)]
    pub custom_users: Vec<Uuid>,
}

/// A firm's parsed policy document, keyed by action name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirmPolicy(pub HashMap<String, PolicyRule>);

impl FirmPolicy {
    /// Parse a policy document from the firm's raw `settings` JSON.
    ///
    /// Unknown or malformed entries are skipped rather than failing the
    /// whole document; an absent or non-object value yields an empty
    /// policy (deny by default).
    pub fn from_settings(settings: &serde_json::Value) -> Self {
        let Some(map) = settings.as_object() else {
            return Self::default();
        };

        let rules = map
            .iter()
            .filter_map(|(action, value)| {
                serde_json::from_value::<PolicyRule>(value.clone())
                    .ok()
                    .map(|rule| (action.clone(), rule))
            })
            .collect();

        Self(rules)
    }

    /// Whether the policy grants the action to a user holding the given
    /// roles. Absent actions are denied.
    pub fn allows(&self, action: &str, role_names: &[&str], user_id: Uuid) -> bool {
        let Some(rule) = self.0.get(action) else {
            return false;
        };

        rule.custom_users.contains(&user_id)
            || rule
                .allowed_roles
                .iter()
                .any(|allowed| role_names.iter().any(|held| held == allowed))
    }
}

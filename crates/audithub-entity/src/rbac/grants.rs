//! The resolved grant graph for a single user.
//!
//! `UserGrants` is the in-memory shape the permission resolver operates on:
//! either preloaded alongside the user (hydrated path) or fetched fresh
//! from the store (fallback path).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One role membership with its permission names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role name.
    pub role: String,
    /// Hierarchy level of the role.
    pub hierarchy_level: i32,
    /// Permission names conferred by the role.
    pub permissions: Vec<String>,
}

/// Every permission path attached to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGrants {
    /// The user the grants belong to.
    pub user_id: Uuid,
    /// Role memberships with their permission sets.
    pub roles: Vec<RoleGrant>,
    /// Direct custom permission grants.
    pub custom: Vec<String>,
}

impl UserGrants {
    /// An empty grant graph for a user with no roles or custom grants.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            roles: Vec::new(),
            custom: Vec::new(),
        }
    }

    /// The de-duplicated union of role permissions and custom grants.
    pub fn effective(&self) -> HashSet<String> {
        let mut set: HashSet<String> = HashSet::new();
        for role in &self.roles {
            set.extend(role.permissions.iter().cloned());
        }
        set.extend(self.custom.iter().cloned());
        set
    }

    /// Whether any path confers the named permission.
    pub fn has(&self, permission: &str) -> bool {
        self.custom.iter().any(|p| p == permission)
            || self
                .roles
                .iter()
                .any(|r| r.permissions.iter().any(|p| p == permission))
    }

    /// Names of the roles this user holds.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.role.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants() -> UserGrants {
        UserGrants {
            user_id: Uuid::new_v4(),
            roles: vec![
                RoleGrant {
                    role: "Partner".to_string(),
                    hierarchy_level: 100,
                    permissions: vec![
                        "create_engagement".to_string(),
                        "view_clients".to_string(),
                    ],
                },
                RoleGrant {
                    role: "Manager".to_string(),
                    hierarchy_level: 80,
                    permissions: vec!["view_clients".to_string()],
                },
            ],
            custom: vec!["export_reports".to_string()],
        }
    }

    #[test]
    fn test_effective_is_union() {
        let effective = grants().effective();
        assert_eq!(effective.len(), 3);
        assert!(effective.contains("create_engagement"));
        assert!(effective.contains("view_clients"));
        assert!(effective.contains("export_reports"));
    }

    #[test]
    fn test_has_checks_both_paths() {
        let g = grants();
        assert!(g.has("create_engagement"));
        assert!(g.has("export_reports"));
        assert!(!g.has("delete_firm"));
    }
}

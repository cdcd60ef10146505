//! Permission resolution — role grants, custom grants, firm policy.
//!
//! A user's effective permission set is the union of every permission
//! attached to their roles and every custom permission granted to them
//! directly. For firm-configurable actions, a firm policy table can
//! additionally allow an action by role name or by explicit user ID
//! when no named permission covers it.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use audithub_core::error::AppError;
use audithub_entity::rbac::UserGrants;

use crate::store::{FirmStore, PermissionStore};

/// A subject whose permissions can be checked.
///
/// Callers that already hold a hydrated grant set (the API extractor
/// loads one per request) expose it here so a positive check avoids a
/// store round trip. A negative hydrated check still falls through to
/// the store, so stale in-memory grants can never deny a permission the
/// user actually holds.
pub trait PermissionSource: Send + Sync {
    /// The user being checked.
    fn user_id(&self) -> Uuid;

    /// Already-loaded grants, if the caller has them.
    fn hydrated_grants(&self) -> Option<&UserGrants>;
}

impl PermissionSource for Uuid {
    fn user_id(&self) -> Uuid {
        *self
    }

    fn hydrated_grants(&self) -> Option<&UserGrants> {
        None
    }
}

impl PermissionSource for UserGrants {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn hydrated_grants(&self) -> Option<&UserGrants> {
        Some(self)
    }
}

/// Resolves effective permissions for users.
#[derive(Clone)]
pub struct PermissionResolver {
    /// Role and custom grant lookup.
    permissions: Arc<dyn PermissionStore>,
    /// Firm policy lookup.
    firms: Arc<dyn FirmStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a new resolver over the given stores.
    pub fn new(permissions: Arc<dyn PermissionStore>, firms: Arc<dyn FirmStore>) -> Self {
        Self { permissions, firms }
    }

    /// Checks whether the subject holds a single permission.
    pub async fn has_permission(
        &self,
        subject: &dyn PermissionSource,
        permission: &str,
    ) -> Result<bool, AppError> {
        if let Some(grants) = subject.hydrated_grants()
            && grants.has(permission)
        {
            return Ok(true);
        }

        let grants = self.permissions.load_grants(subject.user_id()).await?;
        Ok(grants.has(permission))
    }

    /// Returns the subject's full effective permission set, sorted.
    pub async fn user_permissions(&self, user_id: Uuid) -> Result<BTreeSet<String>, AppError> {
        let grants = self.permissions.load_grants(user_id).await?;
        Ok(grants.effective().into_iter().collect())
    }

    /// Requires that the subject holds at least one of the given
    /// permissions.
    pub async fn check_any(
        &self,
        subject: &dyn PermissionSource,
        required: &[&str],
    ) -> Result<(), AppError> {
        for permission in required {
            if self.has_permission(subject, permission).await? {
                return Ok(());
            }
        }

        Err(AppError::forbidden(format!(
            "Missing required permission: one of [{}]",
            required.join(", ")
        )))
    }

    /// Requires that the subject holds every one of the given
    /// permissions.
    pub async fn check_all(
        &self,
        subject: &dyn PermissionSource,
        required: &[&str],
    ) -> Result<(), AppError> {
        for permission in required {
            if !self.has_permission(subject, permission).await? {
                return Err(AppError::forbidden(format!(
                    "Missing required permission: {permission}"
                )));
            }
        }

        Ok(())
    }

    /// Checks whether the subject may perform a firm-configurable
    /// action.
    ///
    /// A named permission always wins; otherwise the firm's policy
    /// table may allow the action by role name or explicit user grant.
    pub async fn allows_action(
        &self,
        subject: &dyn PermissionSource,
        firm_id: Uuid,
        action: &str,
    ) -> Result<bool, AppError> {
        if let Some(grants) = subject.hydrated_grants()
            && grants.has(action)
        {
            return Ok(true);
        }

        let grants = self.permissions.load_grants(subject.user_id()).await?;
        if grants.has(action) {
            return Ok(true);
        }

        let policy = self.firms.load_policy(firm_id).await?;
        Ok(policy.allows(action, &grants.role_names(), subject.user_id()))
    }
}

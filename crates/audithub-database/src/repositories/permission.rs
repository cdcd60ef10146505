//! Permission grant store implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use audithub_auth::store::PermissionStore;
use audithub_core::error::{AppError, ErrorKind};
use audithub_core::result::AppResult;
use audithub_entity::rbac::{Role, RoleGrant, UserGrants};

/// Repository for role and custom permission grant lookup.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn load_grants(&self, user_id: Uuid) -> AppResult<UserGrants> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 \
             ORDER BY r.hierarchy_level DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))?;

        let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();

        let role_permissions: Vec<(Uuid, String)> = sqlx::query_as(
            "SELECT rp.role_id, p.name FROM role_permissions rp \
             JOIN permissions p ON p.id = rp.permission_id \
             WHERE rp.role_id = ANY($1)",
        )
        .bind(&role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
        })?;

        let custom: Vec<String> = sqlx::query_scalar(
            "SELECT p.name FROM user_permissions up \
             JOIN permissions p ON p.id = up.permission_id \
             WHERE up.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load custom permissions", e)
        })?;

        let roles = roles
            .into_iter()
            .map(|role| {
                let permissions = role_permissions
                    .iter()
                    .filter(|(role_id, _)| *role_id == role.id)
                    .map(|(_, name)| name.clone())
                    .collect();
                RoleGrant {
                    hierarchy_level: role.hierarchy_level,
                    permissions,
                    role: role.name,
                }
            })
            .collect();

        Ok(UserGrants {
            user_id,
            roles,
            custom,
        })
    }
}

//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use audithub_auth::rbac::PermissionResolver;
use audithub_auth::session::SessionManager;
use audithub_auth::store::{PermissionStore, UserStore};
use audithub_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Layered permission resolver.
    pub permission_resolver: Arc<PermissionResolver>,
    /// User account lookup.
    pub users: Arc<dyn UserStore>,
    /// Permission grant lookup, used to hydrate request contexts.
    pub permissions: Arc<dyn PermissionStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

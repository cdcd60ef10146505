//! Application builder — wires repositories, auth components, worker,
//! and router into a running server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use audithub_auth::jwt::{JwtDecoder, JwtEncoder};
use audithub_auth::password::PasswordHasher;
use audithub_auth::rbac::PermissionResolver;
use audithub_auth::session::{SessionManager, TokenSweeper};
use audithub_core::config::AppConfig;
use audithub_core::error::AppError;
use audithub_core::traits::SystemClock;
use audithub_database::repositories::{
    AuditRepository, FirmRepository, PermissionRepository, TokenRepository, UserRepository,
};
use audithub_worker::CronScheduler;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application from pre-wired state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the AuditHub server with the given configuration and database
/// pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!("Starting AuditHub server...");

    // Repositories
    let users = Arc::new(UserRepository::new(db_pool.clone()));
    let tokens = Arc::new(TokenRepository::new(db_pool.clone()));
    let permissions = Arc::new(PermissionRepository::new(db_pool.clone()));
    let firms = Arc::new(FirmRepository::new(db_pool.clone()));
    let audit = Arc::new(AuditRepository::new(db_pool.clone()));

    // Auth components
    let clock = Arc::new(SystemClock);
    let hasher = Arc::new(PasswordHasher::new(&config.auth));
    let encoder = Arc::new(JwtEncoder::new(&config.auth));
    let decoder = Arc::new(JwtDecoder::new(&config.auth, clock.clone()));

    let session_manager = Arc::new(SessionManager::new(
        users.clone(),
        tokens.clone(),
        encoder,
        decoder,
        hasher,
        clock.clone(),
        audit,
        config.auth.clone(),
    ));

    let permission_resolver = Arc::new(PermissionResolver::new(permissions.clone(), firms));

    // Background worker
    let mut scheduler = if config.worker.enabled {
        let sweeper = Arc::new(TokenSweeper::new(tokens, clock, &config.session));
        let scheduler = CronScheduler::new(sweeper, &config.session).await?;
        scheduler.register_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        None
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        session_manager,
        permission_resolver,
        users,
        permissions,
    };

    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("AuditHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}

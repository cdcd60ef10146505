//! Auth handlers — login, refresh, logout, password change, me.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use validator::Validate;

use audithub_core::error::AppError;

use crate::dto::request::{ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{
    ApiResponse, LoginResponse, MessageResponse, PermissionsResponse, RefreshResponse,
    UserResponse,
};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let ip_address = header_value(&headers, "x-forwarded-for");
    let user_agent = header_value(&headers, "user-agent");

    let result = state
        .session_manager
        .login(&req.email, &req.password, req.application, ip_address, user_agent)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        access_expires_at: result.access_expires_at,
        refresh_expires_at: result.refresh_expires_at,
        must_change_password: result.must_change_password,
        user: UserResponse::from(&result.user),
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let (access_token, access_expires_at) = state
        .session_manager
        .refresh_access_token(&req.refresh_token)
        .await?;

    Ok(Json(ApiResponse::ok(RefreshResponse {
        access_token,
        access_expires_at,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.session_manager.logout(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .session_manager
        .change_password(user.id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password changed; all sessions have been revoked".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let profile = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&profile))))
}

/// GET /api/auth/permissions
pub async fn permissions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<PermissionsResponse>>, ApiError> {
    let permissions = state
        .permission_resolver
        .user_permissions(user.id)
        .await?
        .into_iter()
        .collect();

    Ok(Json(ApiResponse::ok(PermissionsResponse {
        roles: user.grants.role_names().iter().map(|r| r.to_string()).collect(),
        permissions,
    })))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

//! `CurrentUser` extractor — pulls the JWT from the Authorization
//! header, validates it, hydrates permission grants, and records a
//! session heartbeat.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use audithub_auth::rbac::PermissionSource;
use audithub_core::error::AppError;
use audithub_entity::rbac::UserGrants;
use audithub_entity::token::ApplicationType;
use audithub_entity::user::SeniorityType;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the tool context of the request. Absent means the
/// main portal.
pub const APPLICATION_TYPE_HEADER: &str = "x-application-type";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user's ID.
    pub id: Uuid,
    /// The user's firm (tenant).
    pub firm_id: Uuid,
    /// Email from the token claims.
    pub email: String,
    /// Seniority from the token claims.
    pub seniority: SeniorityType,
    /// The tool this request arrived from.
    pub application: ApplicationType,
    /// Permission grants hydrated at extraction time.
    pub grants: UserGrants,
}

impl PermissionSource for CurrentUser {
    fn user_id(&self) -> Uuid {
        self.id
    }

    fn hydrated_grants(&self) -> Option<&UserGrants> {
        Some(&self.grants)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A permission guard may already have authenticated this
        // request; reuse its work.
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthenticated("Invalid Authorization header format"))?;

        let claims = state.session_manager.verify_access_token(token)?;

        let application = parts
            .headers
            .get(APPLICATION_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| ApplicationType::from_str(v).ok())
            .unwrap_or_default();

        // Heartbeat off the request path; the sweep tolerates a missed
        // beat and the response never waits on it.
        let manager = state.session_manager.clone();
        let user_id = claims.user_id();
        tokio::spawn(async move {
            manager.update_token_heartbeat(user_id, application).await;
        });

        let grants = state.permissions.load_grants(claims.user_id()).await?;

        Ok(CurrentUser {
            id: claims.user_id(),
            firm_id: claims.firm_id,
            email: claims.email,
            seniority: claims.seniority,
            application,
            grants,
        })
    }
}

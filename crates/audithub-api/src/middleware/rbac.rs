//! Permission guard factories for route-level access control.
//!
//! Each factory returns a closure suitable for
//! `axum::middleware::from_fn_with_state`. The authenticated user is
//! extracted once, checked against the resolver, and stashed in request
//! extensions so downstream handlers reuse it.

use std::future::Future;
use std::pin::Pin;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

type GuardFuture = Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>;

/// Guard requiring a single permission.
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(State<AppState>, CurrentUser, Request, Next) -> GuardFuture + Clone {
    move |State(state), user, mut req, next| {
        Box::pin(async move {
            state
                .permission_resolver
                .check_all(&user, &[permission])
                .await?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        })
    }
}

/// Guard requiring every listed permission.
pub fn require_all_permissions(
    permissions: &'static [&'static str],
) -> impl Fn(State<AppState>, CurrentUser, Request, Next) -> GuardFuture + Clone {
    move |State(state), user, mut req, next| {
        Box::pin(async move {
            state
                .permission_resolver
                .check_all(&user, permissions)
                .await?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        })
    }
}

/// Guard requiring at least one of the listed permissions.
pub fn require_any_permissions(
    permissions: &'static [&'static str],
) -> impl Fn(State<AppState>, CurrentUser, Request, Next) -> GuardFuture + Clone {
    move |State(state), user, mut req, next| {
        Box::pin(async move {
            state
                .permission_resolver
                .check_any(&user, permissions)
                .await?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        })
    }
}

//! Session lifecycle tests: login, lockout, single-session enforcement,
//! refresh, logout, and password change.

mod helpers;

use chrono::Duration;

use audithub_auth::store::TokenStore;
use audithub_core::error::ErrorKind;
use audithub_core::events::{AuditAction, AuditOutcome};
use audithub_core::traits::Clock;
use audithub_entity::token::ApplicationType;

use helpers::{PASSWORD, TestHarness};

#[tokio::test]
async fn login_succeeds_with_valid_credentials() {
    let h = TestHarness::new();
    let user = h.create_user("alice@firm.test").await;

    let result = h
        .manager
        .login(
            "alice@firm.test",
            PASSWORD,
            ApplicationType::Main,
            Some("10.0.0.1".into()),
            Some("test-agent".into()),
        )
        .await
        .unwrap();

    assert_eq!(result.user.id, user.id);
    assert!(!result.access_token.is_empty());
    assert!(!result.refresh_token.is_empty());
    assert!(result.access_expires_at < result.refresh_expires_at);

    // Login resets bookkeeping and stamps last_login.
    let stored = h.users.get(user.id).await.unwrap();
    assert_eq!(stored.failed_login_attempts, 0);
    assert_eq!(stored.last_login, Some(h.clock.now()));
}

#[tokio::test]
async fn login_rejects_unknown_email_and_wrong_password_identically() {
    let h = TestHarness::new();
    h.create_user("bob@firm.test").await;

    let unknown = h
        .manager
        .login("nobody@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap_err();
    let wrong = h
        .manager
        .login("bob@firm.test", "Wrong1Pass", ApplicationType::Main, None, None)
        .await
        .unwrap_err();

    assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown.message, wrong.message);
}

#[tokio::test]
async fn fifth_failed_attempt_locks_the_account() {
    let h = TestHarness::new();
    let user = h.create_user("carol@firm.test").await;

    for attempt in 1..=4 {
        let err = h
            .manager
            .login("carol@firm.test", "Wrong1Pass", ApplicationType::Main, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        let stored = h.users.get(user.id).await.unwrap();
        assert_eq!(stored.failed_login_attempts, attempt);
        assert!(stored.locked_until.is_none());
    }

    let err = h
        .manager
        .login("carol@firm.test", "Wrong1Pass", ApplicationType::Main, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountLocked);

    // Correct password no longer helps while locked.
    let err = h
        .manager
        .login("carol@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountLocked);
}

#[tokio::test]
async fn lock_expires_and_successful_login_resets_counter() {
    let h = TestHarness::new();
    let user = h.create_user("dave@firm.test").await;

    for _ in 0..5 {
        let _ = h
            .manager
            .login("dave@firm.test", "Wrong1Pass", ApplicationType::Main, None, None)
            .await;
    }
    assert!(h.users.get(user.id).await.unwrap().locked_until.is_some());

    h.clock.advance(Duration::minutes(31));

    let result = h
        .manager
        .login("dave@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    assert_eq!(result.user.id, user.id);

    let stored = h.users.get(user.id).await.unwrap();
    assert_eq!(stored.failed_login_attempts, 0);
    assert!(stored.locked_until.is_none());
}

#[tokio::test]
async fn inactive_account_cannot_login() {
    let h = TestHarness::new();
    let mut user = h.create_user("eve@firm.test").await;
    user.is_active = false;
    h.users.insert(user).await;

    let err = h
        .manager
        .login("eve@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountInactive);
}

#[tokio::test]
async fn second_login_on_same_tool_is_a_conflict() {
    let h = TestHarness::new();
    h.create_user("frank@firm.test").await;

    h.manager
        .login("frank@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();

    let err = h
        .manager
        .login("frank@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionConflict);
}

#[tokio::test]
async fn concurrent_sessions_on_different_tools_are_allowed() {
    let h = TestHarness::new();
    let user = h.create_user("grace@firm.test").await;

    h.manager
        .login("grace@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    h.manager
        .login("grace@firm.test", PASSWORD, ApplicationType::Confirmation, None, None)
        .await
        .unwrap();

    assert_eq!(h.tokens.active_count(user.id, h.clock.now()).await, 2);
}

#[tokio::test]
async fn client_onboard_allows_parallel_sessions() {
    let h = TestHarness::new();
    let user = h.create_user("heidi@firm.test").await;

    h.manager
        .login("heidi@firm.test", PASSWORD, ApplicationType::ClientOnboard, None, None)
        .await
        .unwrap();
    h.manager
        .login("heidi@firm.test", PASSWORD, ApplicationType::ClientOnboard, None, None)
        .await
        .unwrap();

    assert_eq!(h.tokens.active_count(user.id, h.clock.now()).await, 2);
}

#[tokio::test]
async fn restricted_user_is_denied_other_tools() {
    let h = TestHarness::new();
    h.create_user_with_tools("ivan@firm.test", Some(vec![ApplicationType::Sampling]))
        .await;

    // The scoped tool works.
    h.manager
        .login("ivan@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();

    let err = h
        .manager
        .login("ivan@firm.test", PASSWORD, ApplicationType::Confirmation, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ToolAccessDenied);
}

#[tokio::test]
async fn logout_frees_the_tool_for_a_new_login() {
    let h = TestHarness::new();
    h.create_user("judy@firm.test").await;

    let first = h
        .manager
        .login("judy@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    h.manager.logout(&first.refresh_token).await.unwrap();

    // Logout is idempotent.
    h.manager.logout(&first.refresh_token).await.unwrap();
    h.manager.logout("not-a-known-token").await.unwrap();

    h.manager
        .login("judy@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_issues_new_access_token_without_rotation() {
    let h = TestHarness::new();
    let user = h.create_user("ken@firm.test").await;

    let login = h
        .manager
        .login("ken@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    h.clock.advance(Duration::minutes(3));

    let (access, expires_at) = h
        .manager
        .refresh_access_token(&login.refresh_token)
        .await
        .unwrap();

    let claims = h.manager.verify_access_token(&access).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(expires_at, h.clock.now() + Duration::minutes(15));

    // Refresh counts as activity on the session.
    let row = h
        .tokens
        .find_by_token(&login.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.last_activity, h.clock.now());
}

#[tokio::test]
async fn revoked_refresh_token_is_rejected() {
    let h = TestHarness::new();
    h.create_user("leo@firm.test").await;

    let login = h
        .manager
        .login("leo@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    h.manager.logout(&login.refresh_token).await.unwrap();

    let err = h
        .manager
        .refresh_access_token(&login.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn forged_refresh_token_is_rejected() {
    let h = TestHarness::new();
    h.create_user("mia@firm.test").await;

    let err = h
        .manager
        .refresh_access_token("definitely-not-signed-by-us")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn change_password_revokes_every_session() {
    let h = TestHarness::new();
    let user = h.create_user("nina@firm.test").await;

    let main = h
        .manager
        .login("nina@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    let sampling = h
        .manager
        .login("nina@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();

    h.manager
        .change_password(user.id, PASSWORD, "Brand2New!pass")
        .await
        .unwrap();

    assert_eq!(h.tokens.active_count(user.id, h.clock.now()).await, 0);
    for token in [&main.refresh_token, &sampling.refresh_token] {
        let err = h.manager.refresh_access_token(token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    // Old password is gone, new one works.
    let err = h
        .manager
        .login("nina@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    h.manager
        .login("nina@firm.test", "Brand2New!pass", ApplicationType::Main, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn change_password_requires_the_old_password() {
    let h = TestHarness::new();
    let user = h.create_user("omar@firm.test").await;

    let err = h
        .manager
        .change_password(user.id, "Wrong1Pass", "Brand2New!pass")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOldPassword);

    let weak = h
        .manager
        .change_password(user.id, PASSWORD, "weak")
        .await
        .unwrap_err();
    assert_eq!(weak.kind, ErrorKind::Validation);

    let same = h
        .manager
        .change_password(user.id, PASSWORD, PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(same.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn login_attempts_are_audited() {
    let h = TestHarness::new();
    let user = h.create_user("pam@firm.test").await;

    let _ = h
        .manager
        .login("pam@firm.test", "Wrong1Pass", ApplicationType::Main, None, None)
        .await;
    h.manager
        .login("pam@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    let events = h.audit.recorded().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::Login);
    assert_eq!(events[0].outcome, AuditOutcome::Failure);
    assert_eq!(events[1].outcome, AuditOutcome::Success);
    assert_eq!(events[1].user_id, Some(user.id));
}

#[tokio::test]
async fn restricted_user_can_still_login_to_open_tools() {
    let h = TestHarness::new();
    h.create_user_with_tools("quinn@firm.test", Some(vec![ApplicationType::Sampling]))
        .await;

    // The main portal and client onboarding are open to every active
    // user; allowed_tools only gates the restricted tools.
    h.manager
        .login("quinn@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    h.manager
        .login("quinn@firm.test", PASSWORD, ApplicationType::ClientOnboard, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn session_conflict_is_reported_before_tool_denial() {
    let h = TestHarness::new();
    let mut user = h.create_user("rosa@firm.test").await;

    h.manager
        .login("rosa@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();

    // Tool access is withdrawn while the session is still live; the
    // conflict on the occupied slot is reported first.
    user.allowed_tools = Some(sqlx::types::Json(vec![ApplicationType::Confirmation]));
    h.users.insert(user).await;

    let err = h
        .manager
        .login("rosa@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionConflict);
}

#[tokio::test]
async fn access_token_expiry_follows_the_session_clock() {
    let h = TestHarness::new();
    h.create_user("saul@firm.test").await;

    let login = h
        .manager
        .login("saul@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    assert!(h.manager.verify_access_token(&login.access_token).is_ok());

    h.clock.advance(Duration::minutes(16));

    let err = h
        .manager
        .verify_access_token(&login.access_token)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);

    // The refresh token outlives the access token and still works.
    h.manager
        .refresh_access_token(&login.refresh_token)
        .await
        .unwrap();
}

//! Stale session sweep tests.

mod helpers;

use chrono::Duration;

use audithub_core::error::ErrorKind;
use audithub_core::traits::Clock;
use audithub_entity::token::ApplicationType;

use helpers::{PASSWORD, TestHarness};

#[tokio::test]
async fn idle_session_is_swept_after_threshold() {
    let h = TestHarness::new();
    let user = h.create_user("quinn@firm.test").await;

    let login = h
        .manager
        .login("quinn@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    // Just inside the threshold: nothing to sweep.
    h.clock.advance(Duration::minutes(4));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 0);

    // Past the threshold: the session goes.
    h.clock.advance(Duration::minutes(2));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 1);
    assert_eq!(h.tokens.active_count(user.id, h.clock.now()).await, 0);

    let err = h
        .manager
        .refresh_access_token(&login.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn heartbeat_keeps_a_session_alive() {
    let h = TestHarness::new();
    let user = h.create_user("rita@firm.test").await;

    h.manager
        .login("rita@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    // Heartbeat every 4 minutes stays ahead of the 5 minute threshold.
    for _ in 0..3 {
        h.clock.advance(Duration::minutes(4));
        h.manager
            .update_token_heartbeat(user.id, ApplicationType::Main)
            .await;
        assert_eq!(h.sweeper.run_sweep().await.unwrap(), 0);
    }

    assert_eq!(h.tokens.active_count(user.id, h.clock.now()).await, 1);
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let h = TestHarness::new();
    h.create_user("sam@firm.test").await;

    h.manager
        .login("sam@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    h.clock.advance(Duration::minutes(10));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 1);
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn sweep_only_touches_idle_sessions() {
    let h = TestHarness::new();
    let idle = h.create_user("tess@firm.test").await;
    let active = h.create_user("uma@firm.test").await;

    h.manager
        .login("tess@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();
    h.manager
        .login("uma@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    h.clock.advance(Duration::minutes(4));
    h.manager
        .update_token_heartbeat(active.id, ApplicationType::Main)
        .await;

    h.clock.advance(Duration::minutes(2));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 1);

    assert_eq!(h.tokens.active_count(idle.id, h.clock.now()).await, 0);
    assert_eq!(h.tokens.active_count(active.id, h.clock.now()).await, 1);
}

#[tokio::test]
async fn swept_session_frees_the_tool_slot() {
    let h = TestHarness::new();
    h.create_user("vera@firm.test").await;

    h.manager
        .login("vera@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();

    h.clock.advance(Duration::minutes(6));
    h.sweeper.run_sweep().await.unwrap();

    // The abandoned session no longer blocks a fresh login.
    h.manager
        .login("vera@firm.test", PASSWORD, ApplicationType::Sampling, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn heartbeat_for_a_missing_session_is_a_no_op() {
    let h = TestHarness::new();
    let user = h.create_user("walt@firm.test").await;

    // No session exists for this tool; nothing should blow up.
    h.manager
        .update_token_heartbeat(user.id, ApplicationType::Confirmation)
        .await;
}

#[tokio::test]
async fn session_exactly_at_the_threshold_survives_one_more_tick() {
    let h = TestHarness::new();
    h.create_user("xena@firm.test").await;

    h.manager
        .login("xena@firm.test", PASSWORD, ApplicationType::Main, None, None)
        .await
        .unwrap();

    // Staleness is strict: a heartbeat exactly at the threshold is not
    // yet stale.
    h.clock.advance(Duration::minutes(5));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 0);

    h.clock.advance(Duration::minutes(1));
    assert_eq!(h.sweeper.run_sweep().await.unwrap(), 1);
}

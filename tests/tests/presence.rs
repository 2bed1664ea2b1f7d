//! Presence tracking tests.

use api::response::{ActiveUsersResponse, AttemptResponse};
use chrono::{Duration, Utc};
use integration_tests::setup::TestContext;
use mate_core::Freshness;
use realtime::PresenceConfig;

/// Test heartbeats from separate sessions add active users.
#[tokio::test]
async fn test_heartbeat_counts_sessions() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.post("/api/presence/heartbeat").await;
    let body: AttemptResponse = first.json();
    assert_eq!(body.outcome, "applied");

    // Same session refreshes its row
    server
        .post("/api/presence/heartbeat")
        .add_cookie(first.cookie("wol_session"))
        .await
        .assert_status_ok();
    assert_eq!(ctx.backend.presence_count(), 1);

    server.post("/api/presence/heartbeat").await.assert_status_ok();

    let active: ActiveUsersResponse = server.get("/api/presence/active").await.json();
    assert_eq!(active.active_users, 2);
    assert_eq!(active.freshness, Freshness::Fresh);
}

/// Test leaving removes the session's row.
#[tokio::test]
async fn test_leave_removes_presence() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.post("/api/presence/heartbeat").await;
    assert_eq!(ctx.backend.presence_count(), 1);

    let body: AttemptResponse = server
        .post("/api/presence/leave")
        .add_cookie(first.cookie("wol_session"))
        .await
        .json();
    assert_eq!(body.outcome, "applied");
    assert_eq!(ctx.backend.presence_count(), 0);
}

/// Test rows past the timeout are swept by the stats page.
#[tokio::test]
async fn test_stats_visit_cleans_stale_rows() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.backend
        .seed_presence("gone", Utc::now() - Duration::seconds(600));
    ctx.backend
        .seed_presence("recent", Utc::now() - Duration::seconds(10));

    server.get("/stats").await.assert_status_ok();

    assert!(ctx.backend.last_seen("gone").is_none());
    assert!(ctx.backend.last_seen("recent").is_some());
    assert_eq!(ctx.backend.presence_count(), 2);
}

/// Test the active-user count is served from cache within its TTL.
#[tokio::test]
async fn test_active_users_cached() {
    let ctx = TestContext::with_presence(PresenceConfig::default());
    let server = ctx.server();

    let first: ActiveUsersResponse = server.get("/api/presence/active").await.json();
    assert_eq!(first.active_users, 0);
    assert_eq!(first.freshness, Freshness::Fresh);

    ctx.backend.seed_presence("other", Utc::now());

    let second: ActiveUsersResponse = server.get("/api/presence/active").await.json();
    assert_eq!(second.active_users, 0);
    assert_eq!(second.freshness, Freshness::Cached);

    let fresh = ctx.tracker.refresh_active_users().await;
    assert_eq!(fresh.value, 1);
}

/// Test a failing backend degrades presence but never errors.
#[tokio::test]
async fn test_backend_failure_degrades() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.post("/api/presence/heartbeat").await;
    let known: ActiveUsersResponse = server.get("/api/presence/active").await.json();
    assert_eq!(known.active_users, 1);

    ctx.backend.set_should_fail(true);

    let response = server.post("/api/presence/heartbeat").await;
    response.assert_status_ok();
    let body: AttemptResponse = response.json();
    assert_eq!(body.outcome, "failed");
    assert!(body.reason.is_some());

    let stale: ActiveUsersResponse = server.get("/api/presence/active").await.json();
    assert_eq!(stale.active_users, 1);
    assert_eq!(stale.freshness, Freshness::Stale);
}

/// Test a failing backend with nothing cached falls back to zero.
#[tokio::test]
async fn test_backend_failure_without_cache() {
    let ctx = TestContext::new();
    ctx.backend.set_should_fail(true);
    let server = ctx.server();

    let response = server.get("/api/presence/active").await;
    response.assert_status_ok();
    let body: ActiveUsersResponse = response.json();
    assert_eq!(body.active_users, 0);
    assert_eq!(body.freshness, Freshness::Fallback);
}

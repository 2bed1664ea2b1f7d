//! Health endpoint tests.

use api::response::HealthResponse;
use axum::http::StatusCode;
use integration_tests::setup::TestContext;

/// Test /health reports the live session count and analytics state.
#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/").await;

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: HealthResponse = response.json();
    assert!(["healthy", "degraded", "unhealthy"].contains(&body.status.as_str()));
    assert!(!body.analytics_enabled);
    assert_eq!(body.live_sessions, 1);

    // Disabled analytics is reported but does not count against the status
    let analytics = body
        .components
        .iter()
        .find(|c| c.name == "analytics")
        .expect("analytics component listed");
    assert!(!analytics.enabled);
    assert_eq!(analytics.message.as_deref(), Some("analytics disabled"));
}

/// Test health probes never open a session.
#[tokio::test]
async fn test_health_sets_no_cookie() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.maybe_cookie("wol_session").is_none());

    let body: HealthResponse = response.json();
    assert_eq!(body.live_sessions, 0);
}

/// Test /health/ready and /health/live endpoints.
#[tokio::test]
async fn test_ready_and_live() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/ready").await.assert_status(StatusCode::OK);
    server.get("/health/live").await.assert_status(StatusCode::OK);
}

/// Test probes stay up while the backend is unreachable.
#[tokio::test]
async fn test_ready_and_live_survive_backend_failure() {
    let ctx = TestContext::new();
    ctx.backend.set_should_fail(true);
    let server = ctx.server();

    server.post("/api/presence/heartbeat").await.assert_status_ok();
    server.get("/health/ready").await.assert_status(StatusCode::OK);
    server.get("/health/live").await.assert_status(StatusCode::OK);
}

//! Page rendering and view counting tests.

use api::response::PageViewsResponse;
use axum::http::StatusCode;
use integration_tests::setup::TestContext;
use mate_core::{Freshness, EVENT_PAGE_VIEW, EVENT_STATS_VIEWED};

/// Test the landing page renders and starts a session.
#[tokio::test]
async fn test_home_renders_and_sets_cookie() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("나에게 맞는 술 찾기"));

    let cookie = response.cookie("wol_session");
    assert!(cookie.http_only().unwrap_or(false));
    assert_eq!(ctx.backend.view_count("홈"), 1);
}

/// Test a page is counted once per session, however often it is opened.
#[tokio::test]
async fn test_view_counted_once_per_session() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/").await;
    let cookie = first.cookie("wol_session");

    for _ in 0..3 {
        server
            .get("/")
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();
    }
    assert_eq!(ctx.backend.view_count("홈"), 1);

    // A new visitor counts again
    server.get("/").await.assert_status_ok();
    assert_eq!(ctx.backend.view_count("홈"), 2);

    let views: Vec<_> = ctx
        .events()
        .into_iter()
        .filter(|e| e.is(EVENT_PAGE_VIEW))
        .collect();
    assert_eq!(views.len(), 2);
}

/// Test auto-refresh reloads are never counted.
#[tokio::test]
async fn test_autorefresh_not_counted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/stats")
        .add_query_param("autorefresh", "1")
        .await
        .assert_status_ok();
    assert_eq!(ctx.backend.view_count("통계"), 0);

    server
        .get("/stats")
        .add_header("x-auto-refresh", "true")
        .await
        .assert_status_ok();
    assert_eq!(ctx.backend.view_count("통계"), 0);

    server.get("/stats").await.assert_status_ok();
    assert_eq!(ctx.backend.view_count("통계"), 1);
}

/// Test a session's first auto-refresh still does not consume its count.
#[tokio::test]
async fn test_autorefresh_then_real_visit() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/stats?autorefresh=1").await;
    let cookie = first.cookie("wol_session");
    assert_eq!(ctx.backend.view_count("통계"), 0);

    server
        .get("/stats")
        .add_cookie(cookie)
        .await
        .assert_status_ok();
    assert_eq!(ctx.backend.view_count("통계"), 1);
}

/// Test the stats page refreshes presence and logs stats_viewed once.
#[tokio::test]
async fn test_stats_page_heartbeat_and_milestone() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/stats").await;
    first.assert_status_ok();
    let body = first.text();
    assert!(body.contains("현재 실시간 사용자"));
    assert!(body.contains("/stats?autorefresh=1"));
    assert_eq!(ctx.backend.presence_count(), 1);

    let cookie = first.cookie("wol_session");
    server
        .get("/stats?autorefresh=1")
        .add_cookie(cookie)
        .await
        .assert_status_ok();

    let viewed = ctx
        .events()
        .into_iter()
        .filter(|e| e.is(EVENT_STATS_VIEWED))
        .count();
    assert_eq!(viewed, 1);
    assert_eq!(ctx.backend.presence_count(), 1);
}

/// Test pages keep rendering while the backend is down.
#[tokio::test]
async fn test_pages_render_without_backend() {
    let ctx = TestContext::new();
    ctx.backend.set_should_fail(true);
    let server = ctx.server();

    server.get("/").await.assert_status_ok();
    server.get("/survey").await.assert_status_ok();

    let stats = server.get("/stats").await;
    stats.assert_status_ok();
    assert!(stats.text().contains("페이지별 조회수"));

    let views: PageViewsResponse = server.get("/api/page-views").await.json();
    assert!(views.page_views.is_empty());
    assert_eq!(views.freshness, Freshness::Fallback);
}

/// Test counting through the API.
#[tokio::test]
async fn test_count_page_api() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.post("/api/page-views/survey").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "applied");

    // Counter name, percent-encoded
    let response = server.post("/api/page-views/%EC%84%A4%EB%AC%B8").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "applied");
    assert_eq!(ctx.backend.view_count("설문"), 2);

    server
        .post("/api/page-views/checkout")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// Test the page view table is sorted by count.
#[tokio::test]
async fn test_page_views_sorted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/").await;
    server.get("/").await;
    server.get("/survey").await;

    let views: PageViewsResponse = server.get("/api/page-views").await.json();
    assert_eq!(views.freshness, Freshness::Fresh);
    assert_eq!(views.page_views[0].page_name, "홈");
    assert_eq!(views.page_views[0].view_count, 2);
    assert_eq!(views.page_views[1].page_name, "설문");
}

//! Survey submission tests.

use api::response::{ErrorResponse, SurveyAccepted};
use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use mate_core::EVENT_SURVEY_COMPLETED;
use serde_json::Value;

/// Test a JSON survey is stored with its completion event.
#[tokio::test]
async fn test_submit_json_survey() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .json(&fixtures::valid_survey_json())
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: SurveyAccepted = response.json();
    assert!(body.success);

    let surveys = ctx.surveys();
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0].recommended.as_deref(), Some("사케"));
    assert_eq!(surveys[0].abv, Some(16.5));
    assert_eq!(surveys[0].client_id.as_deref(), Some(body.client_id.as_str()));

    let completed: Vec<_> = ctx
        .events()
        .into_iter()
        .filter(|e| e.is(EVENT_SURVEY_COMPLETED))
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].client_id, body.client_id);
}

/// Test out-of-range fields are rejected and nothing is written.
#[tokio::test]
async fn test_invalid_survey_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .json(&fixtures::invalid_survey_json())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: ErrorResponse = response.json();
    assert_eq!(body.code, "VALID_001");
    assert!(ctx.surveys().is_empty());
}

/// Test ABV bounds are inclusive.
#[tokio::test]
async fn test_abv_bounds() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for abv in [0.0, 100.0] {
        server
            .post("/api/survey")
            .json(&fixtures::survey_json_with_abv(abv))
            .await
            .assert_status(StatusCode::CREATED);
    }
    server
        .post("/api/survey")
        .json(&fixtures::survey_json_with_abv(-0.5))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(ctx.surveys().len(), 2);
}

/// Test non-numeric ABV spellings that parse as floats are rejected.
#[tokio::test]
async fn test_form_rejects_non_finite_abv() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for abv in ["NaN", "inf", "-infinity"] {
        server
            .post("/survey")
            .form(&fixtures::survey_form(abv, "혼술", "사케"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
    assert!(ctx.surveys().is_empty());

    server
        .post("/survey")
        .form(&fixtures::survey_form("20", "혼술", "사케"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let report: Value = server.get("/api/stats").await.json();
    assert_eq!(report["survey"]["summary"]["mean_abv"], 20.0);
}

/// Test the HTML form redirects to the dashboard on success.
#[tokio::test]
async fn test_form_submit_redirects() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/survey")
        .form(&fixtures::survey_form("40", "혼술", "위스키"))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/stats");

    let surveys = ctx.surveys();
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0].food.as_deref(), Some("치즈"));
}

/// Test a bad form value re-renders the form with the error.
#[tokio::test]
async fn test_form_submit_invalid() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/survey")
        .form(&fixtures::survey_form("독함", "혼술", "위스키"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("독함"));
    assert!(ctx.surveys().is_empty());
}

/// Test one visitor walking the whole funnel shows up in the report.
#[tokio::test]
async fn test_funnel_after_full_visit() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let home = server.get("/").await;
    let cookie = home.cookie("wol_session");

    server
        .post("/survey")
        .add_cookie(cookie.clone())
        .form(&fixtures::survey_form("13", "데이트", "와인"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    server
        .get("/stats")
        .add_cookie(cookie)
        .await
        .assert_status_ok();

    let report: Value = server.get("/api/stats").await.json();
    let stages = report["funnel"]["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 3);
    for stage in stages {
        assert_eq!(stage["sessions"], 1);
    }
    assert_eq!(stages[2]["conversion_pct"], 100.0);
    assert_eq!(report["survey"]["summary"]["responses"], 1);
}

/// Test the dashboard renders empty states before any data exists.
#[tokio::test]
async fn test_stats_empty_states() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let report: Value = server.get("/api/stats").await.json();
    assert!(report["funnel"].is_null());
    assert!(report["survey"].is_null());

    let html = server.get("/stats?autorefresh=1").await.text();
    assert!(html.contains("아직 설문 데이터가 없습니다!"));
}

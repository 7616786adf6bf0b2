//! Integration tests for the docheck-review API
//!
//! Drives the full router over an in-memory SQLite database and covers the
//! threshold filter contract, the review session semantics, and the
//! merge-then-append write-back including its deliberate non-idempotence.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use docheck_common::db::{create_schema, insert_record, ExtractedRecord};
use docheck_review::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: in-memory database with the extraction schema
async fn setup_test_db() -> SqlitePool {
    // Single connection so every request sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    create_schema(&pool).await.expect("Should create schema");
    pool
}

fn setup_app(db: SqlitePool) -> Router {
    build_router(AppState::new(db))
}

fn record(
    file_name: &str,
    offset_secs: i64,
    app_score: f64,
    title_score: f64,
    checked: bool,
) -> ExtractedRecord {
    ExtractedRecord {
        file_name: file_name.to_string(),
        inserted_dttm: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + Duration::seconds(offset_secs),
        application_number: "16/123456".to_string(),
        application_number_score: app_score,
        invention_title: "Adjustable widget".to_string(),
        invention_title_score: title_score,
        checked,
    }
}

/// Seed the three canonical scenario rows: R1 passes, R2 needs review,
/// R3 is checked but still low-scoring (in neither subset).
async fn seed_scenarios(db: &SqlitePool) {
    insert_record(db, &record("r1.pdf", 0, 0.95, 0.95, false)).await.unwrap();
    insert_record(db, &record("r2.pdf", 10, 0.5, 0.95, false)).await.unwrap();
    insert_record(db, &record("r3.pdf", 20, 0.5, 0.5, true)).await.unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn row_names(body: &Value) -> Vec<String> {
    body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["file_name"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "docheck-review");
    assert!(body["version"].is_string());
}

// =============================================================================
// Threshold filter contract
// =============================================================================

#[tokio::test]
async fn test_review_default_thresholds_partition() {
    let db = setup_test_db().await;
    seed_scenarios(&db).await;
    let app = setup_app(db);

    let response = app.clone().oneshot(get("/api/review")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["thresholds"]["application_number"], 0.9);
    assert_eq!(body["thresholds"]["invention_title"], 0.9);

    // R2 needs review; R1 passed; R3 is checked-but-low and in neither set
    assert_eq!(row_names(&body), vec!["r2.pdf"]);
    assert_eq!(body["total_rows"], 1);
    assert_eq!(body["passes_count"], 1);

    let passes = app.oneshot(get("/api/passes")).await.unwrap();
    assert_eq!(passes.status(), StatusCode::OK);
    let passes_body = extract_json(passes.into_body()).await;
    assert_eq!(row_names(&passes_body), vec!["r1.pdf"]);
}

#[tokio::test]
async fn test_review_rows_are_insertion_ordered() {
    let db = setup_test_db().await;
    insert_record(&db, &record("later.pdf", 60, 0.1, 0.1, false)).await.unwrap();
    insert_record(&db, &record("earlier.pdf", 0, 0.1, 0.1, false)).await.unwrap();
    let app = setup_app(db);

    let response = app.oneshot(get("/api/review")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(row_names(&body), vec!["earlier.pdf", "later.pdf"]);
}

#[tokio::test]
async fn test_review_invalid_threshold_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(get("/api/review?application_number=1.5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn test_empty_needs_review_is_valid() {
    let db = setup_test_db().await;
    insert_record(&db, &record("good.pdf", 0, 0.99, 0.99, false)).await.unwrap();
    let app = setup_app(db);

    let response = app.oneshot(get("/api/review")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_rows"], 0);
    assert_eq!(body["passes_count"], 1);
}

// =============================================================================
// Review session semantics
// =============================================================================

#[tokio::test]
async fn test_passes_before_session_is_conflict() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(get("/api/passes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_edit_before_session_is_conflict() {
    let app = setup_app(setup_test_db().await);

    let payload = json!({ "rows": [record("r2.pdf", 10, 0.5, 0.95, true)] });
    let response = app
        .oneshot(json_request("PUT", "/api/review/rows", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_commit_before_session_is_conflict() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(json_request("POST", "/api/commit", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_edit_unknown_row_is_rejected() {
    let db = setup_test_db().await;
    seed_scenarios(&db).await;
    let app = setup_app(db);

    app.clone().oneshot(get("/api/review")).await.unwrap();

    let payload = json!({ "rows": [record("ghost.pdf", 0, 0.5, 0.5, true)] });
    let response = app
        .oneshot(json_request("PUT", "/api/review/rows", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("ghost.pdf"));
}

#[tokio::test]
async fn test_same_thresholds_preserve_edits() {
    let db = setup_test_db().await;
    seed_scenarios(&db).await;
    let app = setup_app(db);

    app.clone().oneshot(get("/api/review")).await.unwrap();

    let mut edited = record("r2.pdf", 10, 0.5, 0.95, true);
    edited.application_number = "17/424242".to_string();
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/review/rows", json!({ "rows": [edited] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["updated"], 1);

    // Same thresholds: cached working copy is served, edits intact
    let repeat = app.clone().oneshot(get("/api/review")).await.unwrap();
    let repeat_body = extract_json(repeat.into_body()).await;
    assert_eq!(repeat_body["rows"][0]["application_number"], "17/424242");
    assert_eq!(repeat_body["rows"][0]["checked"], true);

    // Changed thresholds: fresh query, edits discarded
    let refreshed = app
        .oneshot(get("/api/review?application_number=0.8&invention_title=0.8"))
        .await
        .unwrap();
    let refreshed_body = extract_json(refreshed.into_body()).await;
    assert_eq!(refreshed_body["rows"][0]["application_number"], "16/123456");
    assert_eq!(refreshed_body["rows"][0]["checked"], false);
}

// =============================================================================
// Write-back
// =============================================================================

/// Populate the session, mark r2 checked with a corrected value, return app
async fn reviewed_app() -> (Router, SqlitePool) {
    let db = setup_test_db().await;
    seed_scenarios(&db).await;
    let app = setup_app(db.clone());

    app.clone().oneshot(get("/api/review")).await.unwrap();

    let mut edited = record("r2.pdf", 10, 0.5, 0.95, true);
    edited.application_number = "17/424242".to_string();
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/review/rows", json!({ "rows": [edited] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    (app, db)
}

#[tokio::test]
async fn test_commit_merges_and_appends() {
    let (app, db) = reviewed_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/commit", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = extract_json(response.into_body()).await;
    assert_eq!(outcome["merged"], 1);
    assert_eq!(outcome["skipped"], 0);
    assert_eq!(outcome["appended"], 1);

    // Source row is now checked; its extracted value is untouched
    let checked: bool =
        sqlx::query_scalar("SELECT checked FROM extracted_headers WHERE file_name = 'r2.pdf'")
            .fetch_one(&db)
            .await
            .unwrap();
    assert!(checked);

    // History carries the corrected value
    let history = app.oneshot(get("/api/history")).await.unwrap();
    let history_body = extract_json(history.into_body()).await;
    assert_eq!(history_body["total_rows"], 1);
    assert_eq!(history_body["rows"][0]["file_name"], "r2.pdf");
    assert_eq!(history_body["rows"][0]["application_number"], "17/424242");
}

#[tokio::test]
async fn test_commit_twice_appends_twice() {
    let (app, _db) = reviewed_app().await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/commit", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let history = app.oneshot(get("/api/history")).await.unwrap();
    let history_body = extract_json(history.into_body()).await;
    assert_eq!(
        history_body["total_rows"], 2,
        "Re-running the write-back appends a second history entry"
    );
    assert_eq!(history_body["rows"][0]["file_name"], "r2.pdf");
    assert_eq!(history_body["rows"][1]["file_name"], "r2.pdf");
}

#[tokio::test]
async fn test_commit_skips_unmatched_rows() {
    let (app, db) = reviewed_app().await;

    // Remove the source row out from under the session
    sqlx::query("DELETE FROM extracted_headers WHERE file_name = 'r2.pdf'")
        .execute(&db)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/commit", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = extract_json(response.into_body()).await;
    assert_eq!(outcome["merged"], 0);
    assert_eq!(outcome["skipped"], 1);
    // The append still happens; merge and append do not gate each other
    assert_eq!(outcome["appended"], 1);
}

#[tokio::test]
async fn test_commit_with_nothing_checked_is_noop() {
    let db = setup_test_db().await;
    seed_scenarios(&db).await;
    let app = setup_app(db);

    app.clone().oneshot(get("/api/review")).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/commit", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = extract_json(response.into_body()).await;
    assert_eq!(outcome["merged"], 0);
    assert_eq!(outcome["appended"], 0);

    let history = app.oneshot(get("/api/history")).await.unwrap();
    let history_body = extract_json(history.into_body()).await;
    assert_eq!(history_body["total_rows"], 0);
}

// =============================================================================
// UI serving
// =============================================================================

#[tokio::test]
async fn test_ui_routes_serve_static_assets() {
    let app = setup_app(setup_test_db().await);

    let index = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(index.status(), StatusCode::OK);

    let js = app.oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(js.status(), StatusCode::OK);
    assert_eq!(
        js.headers().get("content-type").unwrap(),
        "application/javascript"
    );
}

//! HTTP-level integration tests for the `/intake` endpoints: dry-run
//! validation, listing and reading stored records, and feedback.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

/// Submit a valid record through `/predict/{variant}` and return its ID.
async fn submit(pool: &PgPool, variant: &str, body: serde_json::Value) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(app, &format!("/api/v1/predict/{variant}"), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["record_id"].as_i64().unwrap()
}

fn ectopic_body() -> serde_json::Value {
    json!({"age": "31", "gravidity": "1", "parity": "0"})
}

fn molar_body() -> serde_json::Value {
    json!({"age": "27", "gravida": "1", "parity": "1"})
}

// ---------------------------------------------------------------------------
// Test: dry-run validation of a valid record
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn validate_accepts_valid_record(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/intake/ectopic/validate", ectopic_body()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["errors"], json!([]));
}

// ---------------------------------------------------------------------------
// Test: dry-run validation reports violations with 200 and stores nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn validate_reports_errors_without_persisting(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/intake/molar/validate",
        json!({
            "age": "30",
            "gravida": "0",
            "parity": "0",
            "historyOfMolarPregnancy": "Yes"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(
        json["data"]["errors"],
        json!(["History of molar pregnancy must be 'No' when gravida is 0."])
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM intake_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Test: the gravidity/gravida alias is accepted on either variant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn validate_accepts_alias_spelling(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/intake/ectopic/validate",
        json!({"age": 25, "gravida": 2, "parity": 3}),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["errors"],
        json!(["Parity cannot exceed gravidity."])
    );
}

// ---------------------------------------------------------------------------
// Test: list returns stored records, filtered by variant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_variant(pool: PgPool) {
    submit(&pool, "ectopic", ectopic_body()).await;
    submit(&pool, "molar", molar_body()).await;
    submit(&pool, "molar", molar_body()).await;

    let app = build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/intake").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let app = build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/intake?variant=molar").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|r| r["variant"] == "molar"));

    let app = build_test_app(pool);
    let json = body_json(get(app, "/api/v1/intake?limit=1&offset=1").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: list rejects an out-of-range limit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_rejects_out_of_range_limit(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/intake?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/intake?limit=500").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: unknown record ID returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_record_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/intake/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "IntakeRecord with id 999999 not found");
}

// ---------------------------------------------------------------------------
// Test: feedback is recorded and trimmed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn feedback_is_recorded(pool: PgPool) {
    let id = submit(&pool, "ectopic", ectopic_body()).await;

    let app = build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/intake/{id}/feedback"),
        json!({"confirmed_label": " positive ", "confirmed_by": "dr.okafor"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["confirmed_label"], "positive");
    assert_eq!(json["data"]["confirmed_by"], "dr.okafor");
    assert!(json["data"]["confirmed_at"].is_string());
}

// ---------------------------------------------------------------------------
// Test: blank feedback fields are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_feedback_is_rejected(pool: PgPool) {
    let id = submit(&pool, "molar", molar_body()).await;

    let app = build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/intake/{id}/feedback"),
        json!({"confirmed_label": "   ", "confirmed_by": "dr.okafor"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: feedback on an unknown record returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn feedback_for_missing_record_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = put_json(
        app,
        "/api/v1/intake/4242/feedback",
        json!({"confirmed_label": "negative", "confirmed_by": "dr.okafor"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

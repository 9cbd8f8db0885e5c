#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use obrisk_api::config::{PredictorBackend, PredictorConfig, ServerConfig};
use obrisk_api::router::build_router;
use obrisk_api::state::AppState;
use obrisk_core::intake::{IntakeRecord, Variant};
use obrisk_core::risk::RiskAssessment;
use obrisk_predictor::{Predictor, PredictorError};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_max_connections: 5,
        predictor: PredictorConfig {
            backend: PredictorBackend::Http {
                url: "http://localhost:8000".to_string(),
            },
            timeout_secs: 5,
        },
    }
}

// ---------------------------------------------------------------------------
// Stub predictors
// ---------------------------------------------------------------------------

/// Answers every request with the same probability and counts calls.
pub struct FixedPredictor {
    pub probability: f64,
    pub calls: AtomicUsize,
}

impl FixedPredictor {
    pub fn new(probability: f64) -> Arc<Self> {
        Arc::new(Self {
            probability,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Predictor for FixedPredictor {
    async fn predict(
        &self,
        variant: Variant,
        _record: &IntakeRecord,
    ) -> Result<RiskAssessment, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RiskAssessment::from_probability(variant, self.probability))
    }

    async fn ready(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Always fails as if the model service were down.
pub struct FailingPredictor;

#[async_trait]
impl Predictor for FailingPredictor {
    async fn predict(
        &self,
        _variant: Variant,
        _record: &IntakeRecord,
    ) -> Result<RiskAssessment, PredictorError> {
        Err(PredictorError::Api {
            status: 503,
            body: "model not loaded".to_string(),
        })
    }

    async fn ready(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with a low-risk stub predictor.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, FixedPredictor::new(0.1))
}

/// Build the full application router with the given predictor.
///
/// Goes through [`build_router`], so tests see the production middleware.
pub fn build_test_app_with(pool: PgPool, predictor: Arc<dyn Predictor>) -> Router {
    build_router(AppState {
        pool,
        config: Arc::new(test_config()),
        predictor,
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

//! Liveness and dependency report for the intake service.
//!
//! Records can be validated and stored without the predictor, so a
//! predictor outage only degrades the service. Losing the database makes
//! it unavailable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` (predictor down), or `unavailable` (database down).
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub predictor: PredictorHealth,
}

/// Which scoring backend is configured and whether it can take requests.
#[derive(Debug, Serialize)]
pub struct PredictorHealth {
    pub backend: &'static str,
    pub ready: bool,
}

/// GET /health
///
/// 200 while the database is reachable, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, predictor_ready) = tokio::join!(
        obrisk_db::health_check(&state.pool),
        state.predictor.ready()
    );
    let db_healthy = db.is_ok();

    let (code, status) = match (db_healthy, predictor_ready) {
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        (true, false) => (StatusCode::OK, "degraded"),
        (true, true) => (StatusCode::OK, "ok"),
    };
    if status != "ok" {
        tracing::warn!(
            status,
            db_healthy,
            predictor_ready,
            backend = state.predictor.name(),
            "Service not fully healthy"
        );
    }

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            predictor: PredictorHealth {
                backend: state.predictor.name(),
                ready: predictor_ready,
            },
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

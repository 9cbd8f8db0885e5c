//! Route definitions for the `/predict` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::predict;
use crate::state::AppState;

/// Routes mounted at `/predict`.
///
/// ```text
/// POST   /ectopic   -> predict_ectopic
/// POST   /molar     -> predict_molar
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ectopic", post(predict::predict_ectopic))
        .route("/molar", post(predict::predict_molar))
}

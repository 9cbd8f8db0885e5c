//! Route definitions for the `/intake` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::intake;
use crate::state::AppState;

/// Routes mounted at `/intake`.
///
/// ```text
/// GET    /                    -> list_records      (?variant, ?limit, ?offset)
/// GET    /{id}                -> get_record
/// PUT    /{id}/feedback       -> record_feedback
/// POST   /ectopic/validate    -> validate_ectopic  (dry-run)
/// POST   /molar/validate      -> validate_molar    (dry-run)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(intake::list_records))
        .route("/{id}", get(intake::get_record))
        .route("/{id}/feedback", put(intake::record_feedback))
        .route("/ectopic/validate", post(intake::validate_ectopic))
        .route("/molar/validate", post(intake::validate_molar))
}

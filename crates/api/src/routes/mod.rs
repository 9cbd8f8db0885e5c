pub mod health;
pub mod intake;
pub mod predict;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Validated submission and scoring.
        .nest("/predict", predict::router())
        // Dry-run validation, stored records, feedback.
        .nest("/intake", intake::router())
}

//! Handlers for the `/intake` resource.
//!
//! Dry-run validation for form pre-checks, plus read access to stored
//! records and clinician feedback on their outcome.

use axum::extract::{Path, Query, State};
use axum::Json;
use obrisk_core::error::CoreError;
use obrisk_core::intake::{self, IntakeRecord, ValidationResult, Variant};
use obrisk_core::types::DbId;
use obrisk_db::models::intake::{IntakeListFilter, IntakeRecordRow, RecordFeedback};
use obrisk_db::repositories::IntakeRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for `GET /intake`.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

// ── Dry-run validation ───────────────────────────────────────────────

/// POST /api/v1/intake/ectopic/validate
///
/// Always 200; the body says whether the record would be accepted.
pub async fn validate_ectopic(
    Json(record): Json<IntakeRecord>,
) -> Json<DataResponse<ValidationResult>> {
    Json(DataResponse {
        data: intake::validate(&record, Variant::Ectopic),
    })
}

/// POST /api/v1/intake/molar/validate
pub async fn validate_molar(
    Json(record): Json<IntakeRecord>,
) -> Json<DataResponse<ValidationResult>> {
    Json(DataResponse {
        data: intake::validate(&record, Variant::Molar),
    })
}

// ── Stored records ───────────────────────────────────────────────────

/// Query parameters for `GET /intake`.
#[derive(Debug, Deserialize, Validate)]
pub struct ListIntakeParams {
    pub variant: Option<Variant>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

/// GET /api/v1/intake?variant=&limit=&offset=
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<ListIntakeParams>,
) -> AppResult<Json<DataResponse<Vec<IntakeRecordRow>>>> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let filter = IntakeListFilter {
        variant: params.variant,
        limit: params.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        offset: params.offset.unwrap_or(0),
    };
    let rows = IntakeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/intake/{id}
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IntakeRecordRow>>> {
    let row = IntakeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "IntakeRecord",
            id,
        }))?;
    Ok(Json(DataResponse { data: row }))
}

/// Request body for `PUT /intake/{id}/feedback`.
#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 100))]
    pub confirmed_label: String,
    #[validate(length(min = 1, max = 100))]
    pub confirmed_by: String,
}

/// PUT /api/v1/intake/{id}/feedback
///
/// Record the clinician-confirmed outcome. Returns 404 if not found.
pub async fn record_feedback(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<DataResponse<IntakeRecordRow>>> {
    let input = FeedbackRequest {
        confirmed_label: input.confirmed_label.trim().to_string(),
        confirmed_by: input.confirmed_by.trim().to_string(),
    };
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let feedback = RecordFeedback {
        confirmed_label: input.confirmed_label,
        confirmed_by: input.confirmed_by,
    };
    let row = IntakeRepo::record_feedback(&state.pool, id, &feedback)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "IntakeRecord",
            id,
        }))?;
    tracing::info!(record_id = id, "Feedback recorded");
    Ok(Json(DataResponse { data: row }))
}

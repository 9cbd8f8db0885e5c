//! Handlers for `/predict/{variant}`: the validated submission path.
//!
//! A submission is validated, stored, and then scored. Nothing reaches
//! the store or the predictor unless validation passed.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use obrisk_core::error::CoreError;
use obrisk_core::intake::{self, IntakeRecord, Variant};
use obrisk_core::risk::RiskAssessment;
use obrisk_core::types::DbId;
use obrisk_db::models::intake::CreateIntakeRecord;
use obrisk_db::repositories::IntakeRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body returned for a scored submission.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub record_id: DbId,
    /// Condition the stored record was assessed for, e.g. `Molar Pregnancy`.
    pub condition: &'static str,
    pub result: RiskAssessment,
}

/// POST /api/v1/predict/ectopic
pub async fn predict_ectopic(
    State(state): State<AppState>,
    Json(record): Json<IntakeRecord>,
) -> AppResult<Json<PredictionResponse>> {
    submit(&state, Variant::Ectopic, record).await
}

/// POST /api/v1/predict/molar
pub async fn predict_molar(
    State(state): State<AppState>,
    Json(record): Json<IntakeRecord>,
) -> AppResult<Json<PredictionResponse>> {
    submit(&state, Variant::Molar, record).await
}

/// Validate, persist, and score one record.
///
/// If the predictor fails the record stays stored without a prediction
/// and the caller gets 502. If the record vanished while it was being
/// scored the caller gets 404.
async fn submit(
    state: &AppState,
    variant: Variant,
    record: IntakeRecord,
) -> AppResult<Json<PredictionResponse>> {
    let mut accepted = intake::accept(record, variant).map_err(|result| {
        tracing::debug!(%variant, errors = result.errors.len(), "Submission rejected");
        AppError::InvalidInput(result.errors)
    })?;

    let now = Utc::now();
    let patient_id = accepted.record.backfill_patient_id(now.timestamp_millis());

    let row = IntakeRepo::create(
        &state.pool,
        &CreateIntakeRecord::from_accepted(&accepted, patient_id, now),
    )
    .await?;
    tracing::info!(record_id = row.id, %variant, "Intake record stored");

    let result = state
        .predictor
        .predict(variant, &accepted.record)
        .await
        .map_err(|e| {
            tracing::warn!(
                record_id = row.id,
                predictor = state.predictor.name(),
                error = %e,
                "Stored record left without a prediction"
            );
            AppError::Prediction(e)
        })?;

    let stored = serde_json::to_value(&result)
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let scored = IntakeRepo::record_prediction(&state.pool, row.id, &stored)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "IntakeRecord",
            id: row.id,
        }))?;
    let condition = scored.variant()?.condition();
    tracing::info!(
        record_id = scored.id,
        condition,
        risk_level = ?result.risk_level,
        "Prediction stored"
    );

    Ok(Json(PredictionResponse {
        success: true,
        record_id: scored.id,
        condition,
        result,
    }))
}

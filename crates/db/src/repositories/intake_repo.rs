//! Repository for the `intake_records` table.

use obrisk_core::types::DbId;
use sqlx::PgPool;

use crate::models::intake::{CreateIntakeRecord, IntakeListFilter, IntakeRecordRow, RecordFeedback};

/// Column list for `intake_records` queries.
const COLUMNS: &str = "id, variant, patient_id, age, gravidity, parity, abortions, \
     miscarriages, payload, prediction, predicted_at, confirmed_label, confirmed_by, \
     confirmed_at, created_at, updated_at";

/// Provides persistence operations for submitted intake records.
pub struct IntakeRepo;

impl IntakeRepo {
    /// Insert an accepted record, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateIntakeRecord,
    ) -> Result<IntakeRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO intake_records \
                (variant, patient_id, age, gravidity, parity, abortions, miscarriages, \
                 payload, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IntakeRecordRow>(&query)
            .bind(input.variant.as_str())
            .bind(input.patient_id)
            .bind(input.age)
            .bind(input.gravidity)
            .bind(input.parity)
            .bind(input.abortions)
            .bind(input.miscarriages)
            .bind(&input.payload)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IntakeRecordRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM intake_records WHERE id = $1");
        sqlx::query_as::<_, IntakeRecordRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records newest first, optionally restricted to one variant.
    pub async fn list(
        pool: &PgPool,
        filter: &IntakeListFilter,
    ) -> Result<Vec<IntakeRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM intake_records \
             WHERE ($1::TEXT IS NULL OR variant = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, IntakeRecordRow>(&query)
            .bind(filter.variant.map(|v| v.as_str()))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Store the predictor's answer for a record.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn record_prediction(
        pool: &PgPool,
        id: DbId,
        prediction: &serde_json::Value,
    ) -> Result<Option<IntakeRecordRow>, sqlx::Error> {
        let query = format!(
            "UPDATE intake_records SET prediction = $2, predicted_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IntakeRecordRow>(&query)
            .bind(id)
            .bind(prediction)
            .fetch_optional(pool)
            .await
    }

    /// Record the clinician-confirmed outcome. A later confirmation
    /// replaces an earlier one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn record_feedback(
        pool: &PgPool,
        id: DbId,
        input: &RecordFeedback,
    ) -> Result<Option<IntakeRecordRow>, sqlx::Error> {
        let query = format!(
            "UPDATE intake_records SET \
                confirmed_label = $2, confirmed_by = $3, confirmed_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IntakeRecordRow>(&query)
            .bind(id)
            .bind(&input.confirmed_label)
            .bind(&input.confirmed_by)
            .fetch_optional(pool)
            .await
    }
}

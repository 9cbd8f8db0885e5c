//! Models for stored intake records.

use obrisk_core::error::CoreError;
use obrisk_core::intake::{AcceptedIntake, Variant};
use obrisk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `intake_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntakeRecordRow {
    pub id: DbId,
    pub variant: String,
    pub patient_id: Option<i64>,
    pub age: i64,
    pub gravidity: i64,
    pub parity: i64,
    pub abortions: i64,
    pub miscarriages: i64,
    /// The submitted record as received, after `PatientID` backfill.
    pub payload: serde_json::Value,
    /// The risk assessment, once the predictor has answered.
    pub prediction: Option<serde_json::Value>,
    pub predicted_at: Option<Timestamp>,
    pub confirmed_label: Option<String>,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IntakeRecordRow {
    /// Parse the stored variant tag.
    pub fn variant(&self) -> Result<Variant, CoreError> {
        self.variant.parse()
    }
}

/// DTO for inserting an accepted intake record.
#[derive(Debug, Clone)]
pub struct CreateIntakeRecord {
    pub variant: Variant,
    pub patient_id: Option<i64>,
    pub age: i64,
    pub gravidity: i64,
    pub parity: i64,
    pub abortions: i64,
    pub miscarriages: i64,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

impl CreateIntakeRecord {
    /// Build the insert DTO from an accepted intake.
    ///
    /// `patient_id` is whatever `PatientID` resolved to after backfill.
    pub fn from_accepted(
        intake: &AcceptedIntake,
        patient_id: Option<i64>,
        created_at: Timestamp,
    ) -> Self {
        let profile = &intake.profile;
        Self {
            variant: intake.variant,
            patient_id,
            age: profile.age,
            gravidity: profile.gravidity,
            parity: profile.parity,
            abortions: profile.abortions,
            miscarriages: profile.miscarriages,
            payload: serde_json::Value::Object(intake.record.fields().clone()),
            created_at,
        }
    }
}

/// Clinician confirmation of the true outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordFeedback {
    pub confirmed_label: String,
    pub confirmed_by: String,
}

/// Filter and paging for listing stored records.
#[derive(Debug, Clone, Default)]
pub struct IntakeListFilter {
    pub variant: Option<Variant>,
    pub limit: i64,
    pub offset: i64,
}

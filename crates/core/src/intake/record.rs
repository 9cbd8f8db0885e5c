//! The raw intake record as submitted by a form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::FieldSpec;

/// Key of the patient identifier the predictor expects on every record.
pub const PATIENT_ID_KEY: &str = "PatientID";

/// A submitted intake record: form field name to raw JSON value.
///
/// Values arrive as strings, numbers, or null. Only the fields named in a
/// variant's rule table are checked; every other field passes through
/// untouched to persistence and prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeRecord(Map<String, Value>);

impl IntakeRecord {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a field by its canonical key, falling back to its aliases.
    ///
    /// The first non-blank value wins. If every spelling is blank, the
    /// canonical key's raw value (if any) is returned so the caller can
    /// still tell "absent" from "present but empty".
    pub fn lookup(&self, spec: &FieldSpec) -> Option<&Value> {
        spec.keys()
            .filter_map(|key| self.0.get(key))
            .find(|value| !is_blank(value))
            .or_else(|| self.0.get(spec.key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Set `PatientID` unless the submission already carries a non-blank one.
    ///
    /// Returns the identifier the record ends up with, if it is numeric.
    pub fn backfill_patient_id(&mut self, generated: i64) -> Option<i64> {
        let existing = self.0.get(PATIENT_ID_KEY).filter(|v| !is_blank(v));
        if existing.is_none() {
            self.0
                .insert(PATIENT_ID_KEY.to_string(), Value::from(generated));
        }
        match self.0.get(PATIENT_ID_KEY) {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for IntakeRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Null, or a string that is empty after trimming.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

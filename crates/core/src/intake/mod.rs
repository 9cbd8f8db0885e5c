//! Clinical intake validation engine.
//!
//! Provides the variant rule tables, value coercion, and the pure-logic
//! evaluator that both the dry-run endpoint and the submission gate call.
//! There is exactly one rule set per [`Variant`].

pub mod coerce;
pub mod engine;
pub mod fields;
pub mod record;
pub mod variant;

pub use engine::{accept, validate, AcceptedIntake, ObstetricProfile, ValidationResult};
pub use record::IntakeRecord;
pub use variant::Variant;

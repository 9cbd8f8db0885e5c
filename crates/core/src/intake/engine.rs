//! Intake rule evaluator: pure logic, no I/O.
//!
//! Checks run in a fixed order and never short-circuit:
//!
//! 1. required-field presence
//! 2. type and range per field, in declaration order
//! 3. relational rules against gravidity
//! 4. rules gated on gravidity == 0 (variant specific)
//! 5. rules gated on the history-of-miscarriages flag
//!
//! A field that fails its own check in step 2 is left out of steps 3 to 5.

use serde::{Deserialize, Serialize};

use super::coerce::{self, YesNo};
use super::fields::{FieldSpec, RuleTable, ZeroGravidityRule, AGE_MAX, AGE_MIN};
use super::record::{is_blank, IntakeRecord};
use super::variant::Variant;

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Coerced, defaulted obstetric fields of a record that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObstetricProfile {
    pub age: i64,
    pub gravidity: i64,
    pub parity: i64,
    pub abortions: i64,
    pub miscarriages: i64,
    pub condition_history: YesNo,
    pub miscarriage_history: YesNo,
}

/// A record that passed validation, with its coerced profile.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedIntake {
    pub variant: Variant,
    pub profile: ObstetricProfile,
    pub record: IntakeRecord,
}

/// Validate `record` against the rule table of `variant`.
pub fn validate(record: &IntakeRecord, variant: Variant) -> ValidationResult {
    let (errors, _) = evaluate(record, variant.rules());
    ValidationResult::from_errors(errors)
}

/// Validate `record` and, if it passes, return it with its coerced profile.
pub fn accept(record: IntakeRecord, variant: Variant) -> Result<AcceptedIntake, ValidationResult> {
    let (errors, slots) = evaluate(&record, variant.rules());
    match slots.profile() {
        Some(profile) if errors.is_empty() => Ok(AcceptedIntake {
            variant,
            profile,
            record,
        }),
        _ => Err(ValidationResult::from_errors(errors)),
    }
}

/// State of one field after step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<T> {
    Supplied(T),
    Defaulted,
    /// Missing where required, or failed its own check.
    Invalid,
}

impl<T: Copy> Slot<T> {
    fn or(self, default: T) -> Option<T> {
        match self {
            Slot::Supplied(v) => Some(v),
            Slot::Defaulted => Some(default),
            Slot::Invalid => None,
        }
    }

    fn supplied(self) -> Option<T> {
        match self {
            Slot::Supplied(v) => Some(v),
            _ => None,
        }
    }
}

struct Slots {
    age: Slot<i64>,
    gravidity: Slot<i64>,
    parity: Slot<i64>,
    abortions: Slot<i64>,
    miscarriages: Slot<i64>,
    condition_history: Slot<YesNo>,
    miscarriage_history: Slot<YesNo>,
}

impl Slots {
    fn profile(&self) -> Option<ObstetricProfile> {
        Some(ObstetricProfile {
            age: self.age.supplied()?,
            gravidity: self.gravidity.supplied()?,
            parity: self.parity.supplied()?,
            abortions: self.abortions.or(0)?,
            miscarriages: self.miscarriages.or(0)?,
            condition_history: self.condition_history.or(YesNo::No)?,
            miscarriage_history: self.miscarriage_history.or(YesNo::No)?,
        })
    }
}

fn evaluate(record: &IntakeRecord, rules: &RuleTable) -> (Vec<String>, Slots) {
    let mut errors = Vec::new();

    // (1) presence
    for spec in rules.required() {
        if record.lookup(spec).map_or(true, is_blank) {
            errors.push(format!("{} is required.", spec.label));
        }
    }

    // (2) type and range, declaration order
    let age = match count(record, &rules.age, &mut errors) {
        Slot::Supplied(age) if !(AGE_MIN..=AGE_MAX).contains(&age) => {
            errors.push(format!(
                "{} must be between {AGE_MIN} and {AGE_MAX} years.",
                rules.age.label
            ));
            Slot::Invalid
        }
        Slot::Defaulted => Slot::Invalid,
        other => other,
    };
    let gravidity = required(non_negative(record, &rules.gravidity, &mut errors));
    let parity = required(non_negative(record, &rules.parity, &mut errors));
    let abortions = non_negative(record, &rules.abortions, &mut errors);
    let miscarriages = non_negative(record, &rules.miscarriage_count, &mut errors);
    let condition_history = flag(record, &rules.condition_history, &mut errors);
    let miscarriage_history = flag(record, &rules.miscarriage_history, &mut errors);

    let slots = Slots {
        age,
        gravidity,
        parity,
        abortions,
        miscarriages,
        condition_history,
        miscarriage_history,
    };

    if let Some(g) = slots.gravidity.supplied() {
        relational(rules, &slots, g, &mut errors);
        zero_gravidity(rules, &slots, g, &mut errors);
    }
    miscarriage_gate(rules, &slots, &mut errors);

    (errors, slots)
}

/// (3) Counts measured against gravidity.
fn relational(rules: &RuleTable, s: &Slots, g: i64, errors: &mut Vec<String>) {
    let noun = rules.gravidity.label.to_lowercase();
    let parity = s.parity.supplied();
    let abortions = s.abortions.supplied();
    let miscarriages = s.miscarriages.supplied();

    if parity.is_some_and(|p| p > g) {
        errors.push(format!("Parity cannot exceed {noun}."));
    }
    if abortions.is_some_and(|a| a > g) {
        errors.push(format!("Abortions cannot exceed {noun}."));
    }
    if miscarriages.is_some_and(|m| m > g) {
        errors.push(format!("Number of miscarriages cannot exceed {noun}."));
    }
    if let (Some(p), Some(a)) = (parity, abortions) {
        if exceeds(&[p, a], g) {
            errors.push(format!("Parity + abortions cannot exceed {noun}."));
        }
    }
    if let (Some(p), Some(a), Some(m)) = (parity, s.abortions.or(0), miscarriages) {
        if exceeds(&[p, a, m], g) {
            errors.push(format!(
                "Parity + abortions + miscarriages cannot exceed {noun}."
            ));
        }
    }
}

/// Whether the counts sum past `limit`. A sum that overflows `i64` exceeds
/// any limit.
fn exceeds(counts: &[i64], limit: i64) -> bool {
    counts
        .iter()
        .try_fold(0i64, |sum, &n| sum.checked_add(n))
        .map_or(true, |sum| sum > limit)
}

/// (4) A never-pregnant patient cannot report prior pregnancy outcomes.
fn zero_gravidity(rules: &RuleTable, s: &Slots, g: i64, errors: &mut Vec<String>) {
    if g != 0 {
        return;
    }
    let says_yes = |slot: Slot<YesNo>| slot.supplied().is_some_and(YesNo::is_yes);

    match rules.zero_gravidity {
        ZeroGravidityRule::ConditionHistoryWhenNulliparous => {
            if s.parity.supplied() == Some(0) && says_yes(s.condition_history) {
                errors.push(format!(
                    "{} must be 'No' when {} and parity are both 0.",
                    rules.condition_history.label,
                    rules.gravidity.label.to_lowercase()
                ));
            }
        }
        ZeroGravidityRule::AllHistoryWhenNulligravid => {
            let flags = [
                (&rules.miscarriage_history, s.miscarriage_history),
                (&rules.condition_history, s.condition_history),
            ];
            for (spec, slot) in flags {
                if says_yes(slot) {
                    errors.push(format!(
                        "{} must be 'No' when {} is 0.",
                        spec.label,
                        rules.gravidity.label.to_lowercase()
                    ));
                }
            }
        }
    }
}

/// (5) The miscarriage flag and count must agree.
fn miscarriage_gate(rules: &RuleTable, s: &Slots, errors: &mut Vec<String>) {
    // An absent flag reads as "No"; an unparseable one is already reported.
    let Some(history) = s.miscarriage_history.or(YesNo::No) else {
        return;
    };
    let Some(count) = s.miscarriages.or(0) else {
        return;
    };
    let count_label = rules.miscarriage_count.label;
    let flag_label = rules.miscarriage_history.label.to_lowercase();
    match history {
        YesNo::Yes if count <= 0 => errors.push(format!(
            "{count_label} must be greater than 0 when {flag_label} is 'Yes'."
        )),
        YesNo::No if count != 0 => errors.push(format!(
            "{count_label} must be 0 when {flag_label} is 'No'."
        )),
        _ => {}
    }
}

/// Coerce a numeric field. Absent values become [`Slot::Defaulted`];
/// coercion failures are reported.
fn count(record: &IntakeRecord, spec: &FieldSpec, errors: &mut Vec<String>) -> Slot<i64> {
    match coerce::integer(record.lookup(spec)) {
        Ok(Some(n)) => Slot::Supplied(n),
        Ok(None) => Slot::Defaulted,
        Err(e) => {
            errors.push(e.message(spec.label));
            Slot::Invalid
        }
    }
}

fn non_negative(record: &IntakeRecord, spec: &FieldSpec, errors: &mut Vec<String>) -> Slot<i64> {
    match count(record, spec, errors) {
        Slot::Supplied(n) if n < 0 => {
            errors.push(format!("{} must be non-negative.", spec.label));
            Slot::Invalid
        }
        other => other,
    }
}

/// A required field that was absent has already been reported in step 1.
fn required(slot: Slot<i64>) -> Slot<i64> {
    match slot {
        Slot::Defaulted => Slot::Invalid,
        other => other,
    }
}

fn flag(record: &IntakeRecord, spec: &FieldSpec, errors: &mut Vec<String>) -> Slot<YesNo> {
    match coerce::yes_no(record.lookup(spec)) {
        Ok(Some(v)) => Slot::Supplied(v),
        Ok(None) => Slot::Defaulted,
        Err(e) => {
            errors.push(e.message(spec.label));
            Slot::Invalid
        }
    }
}

//! Canonical field rule tables, one per variant.
//!
//! Both variants share the same record shape; they differ in the spelling
//! of the gravidity field, in which condition-history flag they carry, and
//! in the zero-gravidity rule they enforce.

/// Youngest accepted patient age, inclusive.
pub const AGE_MIN: i64 = 15;
/// Oldest accepted patient age, inclusive.
pub const AGE_MAX: i64 = 49;

/// A form field: its canonical key, accepted alternative spellings, and
/// the label used in violation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub label: &'static str,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            aliases: &[],
            label,
        }
    }

    const fn with_aliases(
        key: &'static str,
        aliases: &'static [&'static str],
        label: &'static str,
    ) -> Self {
        Self {
            key,
            aliases,
            label,
        }
    }

    /// Canonical key followed by its aliases, in lookup order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.key).chain(self.aliases.iter().copied())
    }
}

/// Which history flags must be "No" for a never-pregnant patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroGravidityRule {
    /// When gravidity and parity are both 0, the condition history must be
    /// "No".
    ConditionHistoryWhenNulliparous,
    /// When gravidity is 0, both the miscarriage history and the condition
    /// history must be "No".
    AllHistoryWhenNulligravid,
}

/// Every field the engine checks for one variant, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    pub age: FieldSpec,
    pub gravidity: FieldSpec,
    pub parity: FieldSpec,
    pub abortions: FieldSpec,
    pub miscarriage_count: FieldSpec,
    pub condition_history: FieldSpec,
    pub miscarriage_history: FieldSpec,
    pub zero_gravidity: ZeroGravidityRule,
}

impl RuleTable {
    /// Fields that must be present and non-empty.
    pub fn required(&self) -> [&FieldSpec; 3] {
        [&self.age, &self.gravidity, &self.parity]
    }
}

const AGE: FieldSpec = FieldSpec::new("age", "Age");
const PARITY: FieldSpec = FieldSpec::new("parity", "Parity");
const ABORTIONS: FieldSpec = FieldSpec::new("abortions", "Abortions");
const MISCARRIAGE_COUNT: FieldSpec =
    FieldSpec::new("numberOfMiscarriages", "Number of miscarriages");
const MISCARRIAGE_HISTORY: FieldSpec =
    FieldSpec::new("historyOfMiscarriages", "History of miscarriages");

pub static ECTOPIC_RULES: RuleTable = RuleTable {
    age: AGE,
    gravidity: FieldSpec::with_aliases("gravidity", &["gravida"], "Gravidity"),
    parity: PARITY,
    abortions: ABORTIONS,
    miscarriage_count: MISCARRIAGE_COUNT,
    condition_history: FieldSpec::new("historyOfEctopicPregnancy", "History of ectopic pregnancy"),
    miscarriage_history: MISCARRIAGE_HISTORY,
    zero_gravidity: ZeroGravidityRule::ConditionHistoryWhenNulliparous,
};

pub static MOLAR_RULES: RuleTable = RuleTable {
    age: AGE,
    gravidity: FieldSpec::with_aliases("gravida", &["gravidity"], "Gravida"),
    parity: PARITY,
    abortions: ABORTIONS,
    miscarriage_count: MISCARRIAGE_COUNT,
    condition_history: FieldSpec::new("historyOfMolarPregnancy", "History of molar pregnancy"),
    miscarriage_history: MISCARRIAGE_HISTORY,
    zero_gravidity: ZeroGravidityRule::AllHistoryWhenNulligravid,
};

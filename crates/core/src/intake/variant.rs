//! The two intake variants and their string tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::{RuleTable, ECTOPIC_RULES, MOLAR_RULES};
use crate::error::CoreError;

/// Which condition an intake record is assessed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Ectopic,
    Molar,
}

impl Variant {
    /// Lowercase tag used in routes, the database, and predictor arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Ectopic => "ectopic",
            Variant::Molar => "molar",
        }
    }

    /// Condition name as shown to clinicians and stored with a prediction.
    pub fn condition(self) -> &'static str {
        match self {
            Variant::Ectopic => "Ectopic Pregnancy",
            Variant::Molar => "Molar Pregnancy",
        }
    }

    /// The canonical rule table for this variant.
    pub fn rules(self) -> &'static RuleTable {
        match self {
            Variant::Ectopic => &ECTOPIC_RULES,
            Variant::Molar => &MOLAR_RULES,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ectopic" => Ok(Variant::Ectopic),
            "molar" => Ok(Variant::Molar),
            _ => Err(CoreError::UnsupportedVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Ectopic".parse::<Variant>().unwrap(), Variant::Ectopic);
        assert_eq!(" MOLAR ".parse::<Variant>().unwrap(), Variant::Molar);
    }

    #[test]
    fn unknown_tag_is_unsupported_variant() {
        assert_matches!(
            "antenatal".parse::<Variant>(),
            Err(CoreError::UnsupportedVariant(tag)) if tag == "antenatal"
        );
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(
            serde_json::to_value(Variant::Molar).unwrap(),
            serde_json::json!("molar")
        );
    }
}

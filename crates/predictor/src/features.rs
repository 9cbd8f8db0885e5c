//! Feature vector encoding for the model service.
//!
//! The model service expects every feature present, numeric features as
//! numbers and binary features as `0` / `1`. Form records carry strings,
//! spell keys with varying case, and omit optional fields, so this module
//! fills the gaps with the model's defaults.

use obrisk_core::intake::record::is_blank;
use obrisk_core::intake::{IntakeRecord, Variant};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    /// Parsed as a number; the default applies when absent or unparsable.
    Numeric(f64),
    /// `yes` / `true` / `positive` / non-zero number map to 1, anything else to 0.
    Binary,
}

/// One model input. The first name is the one sent to the service; the
/// rest are accepted spellings in the submitted record.
#[derive(Debug, Clone, Copy)]
struct Feature {
    names: &'static [&'static str],
    kind: Kind,
}

const fn numeric(names: &'static [&'static str], default: f64) -> Feature {
    Feature {
        names,
        kind: Kind::Numeric(default),
    }
}

const fn binary(names: &'static [&'static str]) -> Feature {
    Feature {
        names,
        kind: Kind::Binary,
    }
}

const ECTOPIC_FEATURES: &[Feature] = &[
    numeric(&["age"], 25.0),
    numeric(&["gravidity", "gravida"], 0.0),
    numeric(&["parity"], 0.0),
    numeric(&["abortions"], 0.0),
    binary(&["historyOfEctopicPregnancy"]),
    binary(&["pelvicInflammatoryDisease"]),
    binary(&["tubalSurgeryHistory"]),
    binary(&["infertilityTreatment"]),
    binary(&["smokingStatus"]),
    binary(&["contraceptiveUse"]),
    numeric(&["lastMenstrualPeriodDays"], 28.0),
    binary(&["vaginalBleeding"]),
    binary(&["abdominalPain"]),
    numeric(&["serumHCGLevel"], 0.0),
    numeric(&["progesteroneLevel"], 0.0),
    numeric(&["uterineSizeByUltrasound"], 0.0),
    binary(&["adnexalMass"]),
    binary(&["freeFluidInPouchOfDouglas"]),
];

const MOLAR_FEATURES: &[Feature] = &[
    numeric(&["age"], 25.0),
    numeric(&["gravida", "gravidity"], 0.0),
    numeric(&["parity"], 0.0),
    binary(&["historyOfMolarPregnancy"]),
    binary(&["historyOfMiscarriages"]),
    numeric(&["numberOfMiscarriages"], 0.0),
    binary(&["vaginalBleeding"]),
    binary(&["excessiveNausea"]),
    binary(&["pelvicPain"]),
    binary(&["passageOfVesicles"]),
    binary(&["uterineSizeLarger"]),
    numeric(&["quantitativeHCG"], 0.0),
    numeric(&["bloodGroup"], 0.0),
    binary(&["rhStatus"]),
    numeric(&["thyroidFunction"], 0.0),
    binary(&["gestationalSacPresent"]),
    binary(&["fetalHeartbeat"]),
    binary(&["snowstormAppearance"]),
    binary(&["ovarianCysts"]),
    binary(&["assistedReproduction"]),
    binary(&["smokingAlcohol"]),
];

fn features(variant: Variant) -> &'static [Feature] {
    match variant {
        Variant::Ectopic => ECTOPIC_FEATURES,
        Variant::Molar => MOLAR_FEATURES,
    }
}

/// Encode `record` as the complete feature object for `variant`.
pub fn encode(variant: Variant, record: &IntakeRecord) -> Map<String, Value> {
    features(variant)
        .iter()
        .map(|feature| {
            let raw = feature.names.iter().find_map(|name| find(record, name));
            let value = match feature.kind {
                Kind::Numeric(default) => {
                    Value::from(raw.and_then(as_number).unwrap_or(default))
                }
                Kind::Binary => Value::from(u8::from(raw.is_some_and(is_affirmative))),
            };
            (feature.names[0].to_string(), value)
        })
        .collect()
}

/// Case-insensitive key lookup, skipping null and empty values.
fn find<'r>(record: &'r IntakeRecord, name: &str) -> Option<&'r Value> {
    record
        .fields()
        .iter()
        .find(|(key, value)| key.eq_ignore_ascii_case(name) && !is_blank(value))
        .map(|(_, value)| value)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn is_affirmative(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
        Value::String(s) => {
            let s = s.trim();
            ["yes", "true", "1", "positive"]
                .iter()
                .any(|word| s.eq_ignore_ascii_case(word))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> IntakeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn encodes_every_feature() {
        let encoded = encode(Variant::Ectopic, &record(json!({"age": "30"})));
        assert_eq!(encoded.len(), ECTOPIC_FEATURES.len());
        assert_eq!(encoded["age"], json!(30.0));
        assert_eq!(encoded["lastMenstrualPeriodDays"], json!(28.0));
        assert_eq!(encoded["adnexalMass"], json!(0));
    }

    #[test]
    fn binary_features_accept_several_spellings() {
        let encoded = encode(
            Variant::Molar,
            &record(json!({
                "vaginalBleeding": "Yes",
                "excessiveNausea": true,
                "pelvicPain": 1,
                "rhStatus": "Positive",
                "ovarianCysts": "No",
            })),
        );
        assert_eq!(encoded["vaginalBleeding"], json!(1));
        assert_eq!(encoded["excessiveNausea"], json!(1));
        assert_eq!(encoded["pelvicPain"], json!(1));
        assert_eq!(encoded["rhStatus"], json!(1));
        assert_eq!(encoded["ovarianCysts"], json!(0));
    }

    #[test]
    fn keys_match_case_insensitively_and_aliases_apply() {
        let encoded = encode(
            Variant::Molar,
            &record(json!({"AGE": 41, "gravidity": "3", "QuantitativeHCG": "120000"})),
        );
        assert_eq!(encoded["age"], json!(41.0));
        assert_eq!(encoded["gravida"], json!(3.0));
        assert_eq!(encoded["quantitativeHCG"], json!(120000.0));
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let encoded = encode(
            Variant::Ectopic,
            &record(json!({"serumHCGLevel": "high", "lastMenstrualPeriodDays": ""})),
        );
        assert_eq!(encoded["serumHCGLevel"], json!(0.0));
        assert_eq!(encoded["lastMenstrualPeriodDays"], json!(28.0));
    }
}

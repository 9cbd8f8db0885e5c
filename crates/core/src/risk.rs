//! Risk level interpretation of a model probability.
//!
//! The predictor returns (or lets us derive) the probability of the
//! positive class. This module maps it to a level and the fixed
//! recommendation list for that level.

use serde::{Deserialize, Serialize};

use crate::intake::Variant;

/// Probability at or above which a case is high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Probability at or above which a case is moderate risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if probability >= MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Result payload shown to the clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Probability formatted as a percentage with one decimal, e.g. `"72.5%"`.
    pub percentage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// Interpret a positive-class probability for `variant`.
    ///
    /// Values outside `[0, 1]` are clamped; NaN is treated as 0.
    pub fn from_probability(variant: Variant, probability: f64) -> Self {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        let level = RiskLevel::from_probability(p);
        Self {
            risk_level: level,
            percentage: format!("{:.1}%", p * 100.0),
            probability: Some(p),
            recommendations: recommendations(variant, level)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Fixed recommendation list for a variant and level.
pub fn recommendations(variant: Variant, level: RiskLevel) -> &'static [&'static str] {
    match (variant, level) {
        (Variant::Ectopic, RiskLevel::High) => &[
            "Immediate gynecological consultation required",
            "Emergency department evaluation recommended",
            "Serial hCG monitoring every 12-24 hours",
            "Urgent transvaginal ultrasound examination",
            "Consider diagnostic laparoscopy if clinically indicated",
            "Patient requires immediate medical attention",
        ],
        (Variant::Ectopic, RiskLevel::Moderate) => &[
            "Gynecological consultation within 24-48 hours",
            "Serial hCG monitoring every 48 hours",
            "Transvaginal ultrasound examination",
            "Close clinical monitoring required",
            "Patient education on warning signs",
            "Follow-up appointment scheduled",
        ],
        (Variant::Ectopic, RiskLevel::Low) => &[
            "Routine obstetric follow-up appropriate",
            "Standard prenatal care monitoring",
            "Patient education on pregnancy symptoms",
            "Follow-up as clinically indicated",
            "Monitor for any concerning symptoms",
        ],
        (Variant::Molar, RiskLevel::High) => &[
            "URGENT: Immediate obstetric consultation required",
            "Emergency referral to gynecologic oncology",
            "Serial hCG monitoring every 24-48 hours",
            "Comprehensive ultrasound examination",
            "Prepare for possible evacuation procedure",
            "Patient requires immediate specialized care",
            "Baseline chest X-ray and laboratory workup",
        ],
        (Variant::Molar, RiskLevel::Moderate) => &[
            "Obstetric consultation within 24 hours",
            "Serial hCG monitoring every 48-72 hours",
            "Detailed ultrasound examination required",
            "Consider tissue sampling if indicated",
            "Close follow-up until hCG normalizes",
            "Patient education on warning signs",
            "Monitor for complications",
        ],
        (Variant::Molar, RiskLevel::Low) => &[
            "Routine obstetric follow-up appropriate",
            "Standard prenatal monitoring",
            "Follow-up hCG as clinically indicated",
            "Patient education on pregnancy symptoms",
            "Monitor for any concerning changes",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.399), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.699), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::High);
    }

    #[test]
    fn assessment_formats_percentage() {
        let a = RiskAssessment::from_probability(Variant::Ectopic, 0.7254);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.percentage, "72.5%");
        assert_eq!(a.recommendations.len(), 6);
    }

    #[test]
    fn assessment_clamps_out_of_range_probability() {
        let a = RiskAssessment::from_probability(Variant::Molar, 1.7);
        assert_eq!(a.percentage, "100.0%");
        assert_eq!(a.probability, Some(1.0));

        let b = RiskAssessment::from_probability(Variant::Molar, f64::NAN);
        assert_eq!(b.risk_level, RiskLevel::Low);
        assert_eq!(b.percentage, "0.0%");
    }

    #[test]
    fn recommendations_differ_by_variant() {
        assert_ne!(
            recommendations(Variant::Ectopic, RiskLevel::High),
            recommendations(Variant::Molar, RiskLevel::High)
        );
        assert!(recommendations(Variant::Molar, RiskLevel::High)[0].starts_with("URGENT"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let a = RiskAssessment::from_probability(Variant::Ectopic, 0.1);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["riskLevel"], "Low");
        assert_eq!(json["percentage"], "10.0%");
        assert!(json["recommendations"].is_array());
    }

    #[test]
    fn deserializes_predictor_script_output() {
        let raw = r#"{"riskLevel":"Moderate","percentage":"55.0%","probability":0.55,
                      "recommendations":["Transvaginal ultrasound examination"]}"#;
        let a: RiskAssessment = serde_json::from_str(raw).unwrap();
        assert_eq!(a.risk_level, RiskLevel::Moderate);
        assert_eq!(a.probability, Some(0.55));
    }
}

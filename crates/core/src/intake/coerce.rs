//! Coercion of raw form values into typed intake fields.
//!
//! Each function returns `Ok(None)` for an absent or blank value, so the
//! caller decides whether that means "missing" or "use the default".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::is_blank;

/// Why a present value could not be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceError {
    NotANumber,
    Fractional,
    NotYesNo,
}

impl CoerceError {
    /// Violation message for the field with the given label.
    pub fn message(self, label: &str) -> String {
        match self {
            CoerceError::NotANumber => format!("{label} must be a valid number."),
            CoerceError::Fractional => format!("{label} must be a whole number."),
            CoerceError::NotYesNo => format!("{label} must be 'Yes' or 'No'."),
        }
    }
}

/// Canonical form of a Yes/No answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        })
    }
}

impl FromStr for YesNo {
    type Err = CoerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("yes") {
            Ok(YesNo::Yes)
        } else if s.eq_ignore_ascii_case("no") {
            Ok(YesNo::No)
        } else {
            Err(CoerceError::NotYesNo)
        }
    }
}

/// Coerce a raw value to a whole number.
///
/// Accepts JSON integers, floats without a fractional part, and strings
/// holding either (surrounding whitespace ignored).
pub fn integer(value: Option<&Value>) -> Result<Option<i64>, CoerceError> {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ => return Ok(None),
    };
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => whole(n.as_f64().ok_or(CoerceError::NotANumber)?).map(Some),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Some(i));
            }
            let f = s.parse::<f64>().map_err(|_| CoerceError::NotANumber)?;
            whole(f).map(Some)
        }
        _ => Err(CoerceError::NotANumber),
    }
}

/// Coerce a raw value to a [`YesNo`], ignoring case.
pub fn yes_no(value: Option<&Value>) -> Result<Option<YesNo>, CoerceError> {
    match value {
        Some(v) if is_blank(v) => Ok(None),
        None => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some),
        Some(_) => Err(CoerceError::NotYesNo),
    }
}

fn whole(f: f64) -> Result<i64, CoerceError> {
    if !f.is_finite() {
        return Err(CoerceError::NotANumber);
    }
    if f.fract() != 0.0 {
        return Err(CoerceError::Fractional);
    }
    if f < i64::MIN as f64 || f > i64::MAX as f64 {
        return Err(CoerceError::NotANumber);
    }
    Ok(f as i64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(integer(Some(&json!(25))), Ok(Some(25)));
        assert_eq!(integer(Some(&json!("25"))), Ok(Some(25)));
        assert_eq!(integer(Some(&json!(" 7 "))), Ok(Some(7)));
        assert_eq!(integer(Some(&json!("3.0"))), Ok(Some(3)));
        assert_eq!(integer(Some(&json!(2.0))), Ok(Some(2)));
        assert_eq!(integer(Some(&json!("-1"))), Ok(Some(-1)));
    }

    #[test]
    fn integer_treats_blank_as_absent() {
        assert_eq!(integer(None), Ok(None));
        assert_eq!(integer(Some(&Value::Null)), Ok(None));
        assert_eq!(integer(Some(&json!(""))), Ok(None));
        assert_eq!(integer(Some(&json!("   "))), Ok(None));
    }

    #[test]
    fn integer_rejects_non_numeric() {
        assert_eq!(integer(Some(&json!("abc"))), Err(CoerceError::NotANumber));
        assert_eq!(integer(Some(&json!("12abc"))), Err(CoerceError::NotANumber));
        assert_eq!(integer(Some(&json!(true))), Err(CoerceError::NotANumber));
        assert_eq!(integer(Some(&json!([1]))), Err(CoerceError::NotANumber));
        assert_eq!(integer(Some(&json!("NaN"))), Err(CoerceError::NotANumber));
        assert_eq!(integer(Some(&json!("inf"))), Err(CoerceError::NotANumber));
    }

    #[test]
    fn integer_rejects_fractions() {
        assert_eq!(integer(Some(&json!(2.5))), Err(CoerceError::Fractional));
        assert_eq!(integer(Some(&json!("1.25"))), Err(CoerceError::Fractional));
    }

    #[test]
    fn yes_no_normalizes_case() {
        assert_eq!(yes_no(Some(&json!("yes"))), Ok(Some(YesNo::Yes)));
        assert_eq!(yes_no(Some(&json!("NO"))), Ok(Some(YesNo::No)));
        assert_eq!(yes_no(Some(&json!(" Yes "))), Ok(Some(YesNo::Yes)));
        assert_eq!(yes_no(Some(&json!(""))), Ok(None));
        assert_eq!(yes_no(None), Ok(None));
    }

    #[test]
    fn yes_no_rejects_other_values() {
        assert_eq!(yes_no(Some(&json!("maybe"))), Err(CoerceError::NotYesNo));
        assert_eq!(yes_no(Some(&json!(1))), Err(CoerceError::NotYesNo));
        assert_eq!(yes_no(Some(&json!(true))), Err(CoerceError::NotYesNo));
    }

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            CoerceError::NotANumber.message("Age"),
            "Age must be a valid number."
        );
        assert_eq!(
            CoerceError::NotYesNo.message("History of miscarriages"),
            "History of miscarriages must be 'Yes' or 'No'."
        );
    }
}

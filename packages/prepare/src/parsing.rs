//! Value coercion for loosely-typed sample fields.
//!
//! CSV cells arrive as strings and JSON uploads mix numbers and strings, so
//! every numeric field goes through [`value_as_f64`]. Anything that is not a
//! finite number becomes `None`, mirroring a "coerce errors to missing"
//! conversion.

use chrono::{NaiveDate, NaiveDateTime};

/// Coerces a JSON value into a finite `f64`.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace is
/// ignored). Returns `None` for anything else, including `NaN`/`inf`.
#[must_use]
pub fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Coerces a JSON value into a non-empty string.
///
/// Numbers and booleans are rendered; empty strings and nulls are `None`.
#[must_use]
pub fn value_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerces a JSON value into a calendar year.
///
/// Fractional years (e.g. `2019.0` from a float column) are rounded.
#[must_use]
pub fn value_as_year(value: &serde_json::Value) -> Option<i32> {
    let year = value_as_f64(value)?.round();
    #[allow(clippy::cast_possible_truncation)]
    (f64::from(i32::MIN)..=f64::from(i32::MAX))
        .contains(&year)
        .then_some(year as i32)
}

/// Parses a sample date in any of the formats seen in survey exports.
#[must_use]
pub fn parse_sample_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

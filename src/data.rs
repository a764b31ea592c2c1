//! Cell values and the token rules used to read them.
//!
//! Every cell in a [`crate::frame::Table`] is an `Option<Value>`; `None` is a
//! missing cell. Raw CSV text becomes a value through [`parse_numeric`] or is
//! kept as a string, depending on how the column was classified.

use std::fmt;

use serde::{Serialize, Serializer};

/// Tokens read as missing, in addition to the empty cell.
pub const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "#N/A N/A",
    "#NA", "<NA>", "-1.#IND", "1.#IND", "-1.#QNAN", "1.#QNAN",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(_) => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_number(*f),
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Parses a non-missing numeric token, preferring integers.
pub fn parse_numeric(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(Value::Integer(parsed));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| !f.is_nan())
        .map(Value::Float)
}

pub fn cell_display(cell: Option<&Value>) -> String {
    cell.map(Value::as_display).unwrap_or_default()
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Fixed two-decimal rendering used for aggregated measures.
pub fn format_measure(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tokens_cover_blank_and_placeholders() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("   "));
        assert!(is_missing_token("NA"));
        assert!(is_missing_token(" NaN "));
        assert!(is_missing_token("#N/A"));
        assert!(!is_missing_token("na"));
        assert!(!is_missing_token("Aspirin"));
        assert!(!is_missing_token("0"));
    }

    #[test]
    fn parse_numeric_prefers_integers() {
        assert_eq!(parse_numeric("42"), Some(Value::Integer(42)));
        assert_eq!(parse_numeric(" -7 "), Some(Value::Integer(-7)));
        assert_eq!(parse_numeric("13.5"), Some(Value::Float(13.5)));
        assert_eq!(parse_numeric("1e3"), Some(Value::Float(1000.0)));
        assert_eq!(parse_numeric("12 tabs"), None);
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(Value::Float(2024.0).as_display(), "2024");
        assert_eq!(Value::Float(1.25).as_display(), "1.25");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(cell_display(None), "");
    }

    #[test]
    fn format_measure_uses_two_decimals() {
        assert_eq!(format_measure(150.0), "150");
        assert_eq!(format_measure(2.5), "2.50");
        assert_eq!(format_measure(12.3456), "12.35");
    }
}

//! Typed site settings: value types and read/write coercion.
//!
//! Settings are persisted as text. The declared [`SettingType`] decides how the
//! stored text is turned back into a JSON value on read ([`decode_value`]) and
//! how an incoming JSON value is flattened into text on write
//! ([`encode_value`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Group assigned to settings created without an explicit group.
pub const DEFAULT_SETTING_GROUP: &str = "general";

/// Valid values for the `type` column.
pub const VALID_SETTING_TYPES: &[&str] = &["text", "textarea", "number", "boolean", "json"];

/// Numeric strings: optional surrounding whitespace, optional sign, integer or
/// decimal mantissa, optional exponent.
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").expect("valid numeric regex")
});

// ---------------------------------------------------------------------------
// SettingType
// ---------------------------------------------------------------------------

/// Declared type of a site setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    Text,
    Textarea,
    Number,
    Boolean,
    Json,
}

impl SettingType {
    /// Parse from the database `setting_type` column or a request field.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "text" => Ok(Self::Text),
            "textarea" => Ok(Self::Textarea),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "json" => Ok(Self::Json),
            other => Err(CoreError::Validation(format!(
                "Invalid setting type '{other}'. Must be one of: {VALID_SETTING_TYPES:?}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Json => "json",
        }
    }

    /// Like [`SettingType::from_name`], but unknown names fall back to `text`.
    ///
    /// Used on the read path so a row with an unexpected type still renders.
    pub fn from_name_lossy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Scalar parsers
// ---------------------------------------------------------------------------

/// Permissive boolean parser.
///
/// `"1"`, `"true"`, `"yes"` and `"on"` (case-insensitive, surrounding
/// whitespace ignored) are true; every other string is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether `raw` is a numeric string (integer, decimal or exponent form).
pub fn is_numeric(raw: &str) -> bool {
    NUMERIC_RE.is_match(raw)
}

/// Convert a numeric string to an integer, truncating any fractional part.
///
/// Returns `None` when the string is not numeric or does not fit in an `i64`.
pub fn numeric_to_int(raw: &str) -> Option<i64> {
    if !is_numeric(raw) {
        return None;
    }
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.trim_start_matches('+').parse::<i64>() {
        return Some(n);
    }
    let float: f64 = trimmed.parse().ok()?;
    let truncated = float.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Truthiness of an incoming JSON value for boolean settings.
///
/// Strings go through [`parse_bool`], numbers are true when non-zero, arrays
/// and objects when non-empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => parse_bool(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Whether a value counts as supplied for a required field.
///
/// `null`, blank strings and empty arrays/objects are missing; `false` and `0`
/// are present.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Decode a stored value according to its declared type.
///
/// - `json`: parsed as JSON; unparseable text decodes to `null`.
/// - `boolean`: [`parse_bool`]; a missing value is `false`.
/// - `number`: an integer when the text is numeric, otherwise the raw string.
/// - `text` / `textarea`: the raw string.
pub fn decode_value(setting_type: SettingType, raw: Option<&str>) -> Value {
    match setting_type {
        SettingType::Json => raw
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or(Value::Null),
        SettingType::Boolean => Value::Bool(raw.is_some_and(parse_bool)),
        SettingType::Number => match raw {
            Some(s) => numeric_to_int(s)
                .map(Value::from)
                .unwrap_or_else(|| Value::String(s.to_string())),
            None => Value::Null,
        },
        SettingType::Text | SettingType::Textarea => raw
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
    }
}

/// Encode an incoming value into its stored text form.
///
/// - `json`: serialized JSON text.
/// - `boolean`: `"1"` when [`is_truthy`], otherwise `"0"`.
/// - other types: strings are stored verbatim; any other JSON value is stored
///   as its JSON text (`42`, `true`, `[1,2]`).
pub fn encode_value(setting_type: SettingType, value: &Value) -> String {
    match setting_type {
        SettingType::Json => value.to_string(),
        SettingType::Boolean => {
            if is_truthy(value) {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        SettingType::Text | SettingType::Textarea | SettingType::Number => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn round_trip(setting_type: SettingType, value: Value) -> Value {
        let stored = encode_value(setting_type, &value);
        decode_value(setting_type, Some(&stored))
    }

    #[test]
    fn setting_type_names_round_trip() {
        for name in VALID_SETTING_TYPES {
            let ty = SettingType::from_name(name).unwrap();
            assert_eq!(ty.as_str(), *name);
        }
    }

    #[test]
    fn unknown_setting_type_is_rejected() {
        assert_matches!(
            SettingType::from_name("color"),
            Err(CoreError::Validation(msg)) if msg.contains("color")
        );
        assert_eq!(SettingType::from_name_lossy("color"), SettingType::Text);
    }

    #[test]
    fn parse_bool_accepts_truthy_words() {
        for raw in ["1", "true", "TRUE", "Yes", "on", " on "] {
            assert!(parse_bool(raw), "{raw:?} should be true");
        }
        for raw in ["0", "false", "no", "off", "", "2", "y", "enabled"] {
            assert!(!parse_bool(raw), "{raw:?} should be false");
        }
    }

    #[test]
    fn numeric_detection() {
        for raw in ["200", "-5", "+7", "1.5", ".5", "1e3", " 42 "] {
            assert!(is_numeric(raw), "{raw:?} should be numeric");
        }
        for raw in ["", "abc", "12abc", "0x1A", "1.2.3", "e5"] {
            assert!(!is_numeric(raw), "{raw:?} should not be numeric");
        }
    }

    #[test]
    fn numeric_to_int_truncates() {
        assert_eq!(numeric_to_int("200"), Some(200));
        assert_eq!(numeric_to_int("1.9"), Some(1));
        assert_eq!(numeric_to_int("-1.9"), Some(-1));
        assert_eq!(numeric_to_int("1e3"), Some(1000));
        assert_eq!(numeric_to_int("+7"), Some(7));
        assert_eq!(numeric_to_int("1e400"), None);
        assert_eq!(numeric_to_int("abc"), None);
    }

    #[test]
    fn number_decodes_to_integer_when_numeric() {
        assert_eq!(decode_value(SettingType::Number, Some("200")), json!(200));
        assert_eq!(
            decode_value(SettingType::Number, Some("lots")),
            json!("lots")
        );
    }

    #[test]
    fn boolean_is_stored_as_one_or_zero() {
        assert_eq!(encode_value(SettingType::Boolean, &json!(true)), "1");
        assert_eq!(encode_value(SettingType::Boolean, &json!(false)), "0");
        assert_eq!(encode_value(SettingType::Boolean, &json!("yes")), "1");
        assert_eq!(encode_value(SettingType::Boolean, &json!("false")), "0");
        assert_eq!(encode_value(SettingType::Boolean, &json!(0)), "0");
        assert_eq!(encode_value(SettingType::Boolean, &json!(3)), "1");
    }

    #[test]
    fn missing_boolean_decodes_false() {
        assert_eq!(decode_value(SettingType::Boolean, None), json!(false));
    }

    #[test]
    fn invalid_json_decodes_to_null() {
        assert_eq!(decode_value(SettingType::Json, Some("{not json")), Value::Null);
    }

    #[test]
    fn values_round_trip_for_every_type() {
        assert_eq!(round_trip(SettingType::Text, json!("Hello")), json!("Hello"));
        assert_eq!(
            round_trip(SettingType::Textarea, json!("line one\nline two")),
            json!("line one\nline two")
        );
        assert_eq!(round_trip(SettingType::Number, json!(150)), json!(150));
        assert_eq!(round_trip(SettingType::Number, json!("150")), json!(150));
        assert_eq!(round_trip(SettingType::Boolean, json!(true)), json!(true));
        assert_eq!(round_trip(SettingType::Boolean, json!(false)), json!(false));

        let structured = json!({"links": ["a", "b"], "count": 2, "nested": {"ok": true}});
        assert_eq!(round_trip(SettingType::Json, structured.clone()), structured);
        assert_eq!(round_trip(SettingType::Json, json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(round_trip(SettingType::Json, json!("scalar")), json!("scalar"));
    }

    #[test]
    fn non_string_text_values_store_json_text() {
        assert_eq!(encode_value(SettingType::Text, &json!(42)), "42");
        assert_eq!(encode_value(SettingType::Text, &json!([1, 2])), "[1,2]");
    }

    #[test]
    fn filled_values() {
        assert!(!is_filled(&Value::Null));
        assert!(!is_filled(&json!("  ")));
        assert!(!is_filled(&json!([])));
        assert!(is_filled(&json!(false)));
        assert!(is_filled(&json!(0)));
        assert!(is_filled(&json!("x")));
    }
}

//! Lenient field deserializers for request bodies.
//!
//! Multipart forms deliver every field as text, so numeric and boolean fields
//! accept both their JSON type and a string spelling. Strings are trimmed and
//! a blank string counts as absent.

use enki_core::settings::parse_bool;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Trimmed string; `null` or missing becomes `""`.
pub fn trimmed<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .map(|s| s.trim().to_string())
        .unwrap_or_default())
}

/// Trimmed optional string; blank becomes `None`.
pub fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Like [`blank_as_none`], but keeps "missing" apart from "sent as null or
/// blank": a present field is always `Some`, with `Some(None)` meaning clear.
/// Pair with `#[serde(default)]`.
pub fn present_blank_as_none<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Option<String>>, D::Error> {
    blank_as_none(d).map(Some)
}

/// Integer given as a JSON number or a numeric string.
pub fn flexible_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    let invalid = || D::Error::custom("expected an integer");
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Boolean given as a JSON bool, `0`/`1`, or a boolean-ish string.
pub fn flexible_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().is_some_and(|n| n != 0.0))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(parse_bool(&s))),
        Some(_) => Err(D::Error::custom("expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::trimmed")]
        name: String,
        #[serde(default, deserialize_with = "super::blank_as_none")]
        client: Option<String>,
        #[serde(default, deserialize_with = "super::flexible_i32")]
        order: Option<i32>,
        #[serde(default, deserialize_with = "super::flexible_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "super::present_blank_as_none")]
        note: Option<Option<String>>,
    }

    fn sample(value: serde_json::Value) -> Result<Sample, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn missing_fields_use_defaults() {
        let p = sample(json!({})).unwrap();
        assert_eq!(p.name, "");
        assert_eq!(p.client, None);
        assert_eq!(p.order, None);
        assert_eq!(p.flag, None);
    }

    #[test]
    fn strings_are_trimmed_and_blank_is_absent() {
        let p = sample(json!({ "name": "  Reel ", "client": "   " })).unwrap();
        assert_eq!(p.name, "Reel");
        assert_eq!(p.client, None);
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(sample(json!({ "order": "7" })).unwrap().order, Some(7));
        assert_eq!(sample(json!({ "order": 3 })).unwrap().order, Some(3));
        assert!(sample(json!({ "order": "seven" })).is_err());
    }

    #[test]
    fn booleans_accept_form_spellings() {
        assert_eq!(sample(json!({ "flag": "1" })).unwrap().flag, Some(true));
        assert_eq!(sample(json!({ "flag": "false" })).unwrap().flag, Some(false));
        assert_eq!(sample(json!({ "flag": 0 })).unwrap().flag, Some(false));
        assert_eq!(sample(json!({ "flag": true })).unwrap().flag, Some(true));
    }

    #[test]
    fn present_fields_keep_null_apart_from_missing() {
        assert_eq!(sample(json!({})).unwrap().note, None);
        assert_eq!(sample(json!({ "note": null })).unwrap().note, Some(None));
        assert_eq!(sample(json!({ "note": "  " })).unwrap().note, Some(None));
        assert_eq!(
            sample(json!({ "note": " Called " })).unwrap().note,
            Some(Some("Called".to_string()))
        );
    }
}

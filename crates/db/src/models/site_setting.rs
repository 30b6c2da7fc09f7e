//! Site setting entity model, DTOs, and the public read views.
//!
//! Values are stored as text and carry a declared type; every read goes
//! through [`SiteSetting::typed_value`] so callers never see the raw text.

use enki_core::settings::{decode_value, encode_value, SettingType, DEFAULT_SETTING_GROUP};
use enki_core::types::{DbId, Timestamp};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// A setting row from the `site_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct SiteSetting {
    pub id: DbId,
    pub key: String,
    /// Stored text form; decode with [`SiteSetting::typed_value`].
    pub value: Option<String>,
    pub setting_type: String,
    pub group_name: String,
    pub label: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SiteSetting {
    /// Declared type. Unknown names read as `text`.
    pub fn kind(&self) -> SettingType {
        SettingType::from_name_lossy(&self.setting_type)
    }

    /// The stored value decoded according to [`SiteSetting::kind`].
    pub fn typed_value(&self) -> Value {
        decode_value(self.kind(), self.value.as_deref())
    }
}

/// Encode an incoming value for storage under `setting_type`.
///
/// `null` clears the value for every type except `boolean`, which stores
/// `"0"`.
pub fn stored_value(setting_type: SettingType, value: &Value) -> Option<String> {
    match (setting_type, value) {
        (SettingType::Boolean, _) => Some(encode_value(setting_type, value)),
        (_, Value::Null) => None,
        _ => Some(encode_value(setting_type, value)),
    }
}

/// Setting as returned by the admin endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSettingResponse {
    pub id: DbId,
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub setting_type: String,
    pub group: String,
    pub label: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<SiteSetting> for SiteSettingResponse {
    fn from(s: SiteSetting) -> Self {
        Self {
            value: s.typed_value(),
            id: s.id,
            key: s.key,
            setting_type: s.setting_type,
            group: s.group_name,
            label: s.label,
            description: s.description,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Write request for a single setting.
///
/// `setting_type`, `group` and `label` only apply when the key does not
/// exist yet; an existing setting keeps its declared type.
#[derive(Debug, Clone)]
pub struct SettingUpsert {
    pub key: String,
    pub value: Value,
    pub setting_type: Option<SettingType>,
    pub group: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl SettingUpsert {
    /// A value-only write using the defaults for any new row.
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            setting_type: None,
            group: None,
            label: None,
            description: None,
        }
    }

    pub fn resolved_type(&self) -> SettingType {
        self.setting_type.unwrap_or_default()
    }

    pub fn resolved_group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_SETTING_GROUP)
    }

    /// Label for a new row; defaults to the key itself.
    pub fn resolved_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

// ---------------------------------------------------------------------------
// Public views
// ---------------------------------------------------------------------------

/// One entry of the grouped settings view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedSetting {
    pub value: Value,
    pub label: String,
    #[serde(rename = "type")]
    pub setting_type: String,
}

/// `group -> key -> {value, label, type}`, groups and keys in row order.
pub type GroupedSettings = IndexMap<String, IndexMap<String, GroupedSetting>>;

/// `key -> value`, keys in row order.
pub type FlatSettings = IndexMap<String, Value>;

/// Build the grouped view from rows already sorted by group then key.
pub fn grouped_view(settings: &[SiteSetting]) -> GroupedSettings {
    let mut groups = GroupedSettings::new();
    for s in settings {
        groups.entry(s.group_name.clone()).or_default().insert(
            s.key.clone(),
            GroupedSetting {
                value: s.typed_value(),
                label: s.label.clone(),
                setting_type: s.setting_type.clone(),
            },
        );
    }
    groups
}

/// Build the flat view.
pub fn flat_view(settings: &[SiteSetting]) -> FlatSettings {
    settings
        .iter()
        .map(|s| (s.key.clone(), s.typed_value()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setting(key: &str, value: Option<&str>, ty: &str, group: &str) -> SiteSetting {
        SiteSetting {
            id: DbId::new_v4(),
            key: key.to_string(),
            value: value.map(str::to_string),
            setting_type: ty.to_string(),
            group_name: group.to_string(),
            label: key.to_uppercase(),
            description: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn typed_value_follows_declared_type() {
        assert_eq!(setting("a", Some("150"), "number", "stats").typed_value(), json!(150));
        assert_eq!(setting("b", Some("1"), "boolean", "x").typed_value(), json!(true));
        assert_eq!(setting("c", Some("[1,2]"), "json", "x").typed_value(), json!([1, 2]));
        assert_eq!(setting("d", Some("hi"), "text", "x").typed_value(), json!("hi"));
        assert_eq!(setting("e", None, "text", "x").typed_value(), Value::Null);
    }

    #[test]
    fn grouped_view_nests_by_group() {
        let rows = vec![
            setting("contact_email", Some("a@b.c"), "text", "contact"),
            setting("stat_projects", Some("150"), "number", "stats"),
            setting("stat_clients", Some("50"), "number", "stats"),
        ];
        let view = grouped_view(&rows);
        assert_eq!(view.len(), 2);
        assert_eq!(view["stats"].len(), 2);
        assert_eq!(view["stats"]["stat_projects"].value, json!(150));
        assert_eq!(view["stats"]["stat_projects"].setting_type, "number");
        assert_eq!(view["contact"]["contact_email"].label, "CONTACT_EMAIL");
    }

    #[test]
    fn flat_view_maps_key_to_value() {
        let rows = vec![
            setting("hero_title", Some("Hello"), "text", "hero"),
            setting("maintenance", Some("0"), "boolean", "general"),
        ];
        let view = flat_view(&rows);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "hero_title": "Hello", "maintenance": false })
        );
    }

    #[test]
    fn null_clears_non_boolean_values() {
        assert_eq!(stored_value(SettingType::Text, &Value::Null), None);
        assert_eq!(stored_value(SettingType::Boolean, &Value::Null), Some("0".into()));
        assert_eq!(stored_value(SettingType::Number, &json!(42)), Some("42".into()));
    }

    #[test]
    fn upsert_defaults() {
        let upsert = SettingUpsert::new("new_key", json!("v"));
        assert_eq!(upsert.resolved_type(), SettingType::Text);
        assert_eq!(upsert.resolved_group(), "general");
        assert_eq!(upsert.resolved_label(), "new_key");
    }
}

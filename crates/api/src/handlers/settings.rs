//! Handlers for the `/settings` resource (typed key/value store).
//!
//! Reads are public and come back either grouped with display metadata or
//! as a flat key -> value map. Writes upsert by key: an unknown key is
//! created, an existing key only has its value replaced.

use axum::extract::{Path, Query, State};
use axum::Json;
use enki_core::error::CoreError;
use enki_core::search::normalize_term;
use enki_core::settings::{is_filled, SettingType};
use enki_db::models::site_setting::{
    flat_view, grouped_view, FlatSettings, GroupedSettings, SettingUpsert, SiteSettingResponse,
};
use enki_db::repositories::SiteSettingRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::de;
use crate::error::{field_errors, AppError, AppResult, FieldErrors};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use super::invalid;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /settings`.
#[derive(Debug, Deserialize)]
pub struct SettingsIndexParams {
    pub group: Option<String>,
    /// Only the literal `true` selects the flat view.
    pub flat: Option<String>,
}

/// Either read view of the settings table.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SettingsIndex {
    Grouped(GroupedSettings),
    Flat(FlatSettings),
}

/// Body for `PUT /settings`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkSettingsRequest {
    /// Kept raw so each entry can fail on its own.
    #[serde(default)]
    #[validate(custom(function = "validate_settings_list"))]
    pub settings: Value,
}

/// One entry of a bulk write.
#[derive(Debug, Deserialize, Validate)]
pub struct SettingEntry {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 255, message = "The key field is required and may not be greater than 255 characters."))]
    pub key: String,
    #[serde(default)]
    #[validate(custom(function = "validate_filled"))]
    pub value: Value,
    #[serde(default, rename = "type", deserialize_with = "de::blank_as_none")]
    #[validate(custom(function = "validate_setting_type"))]
    pub setting_type: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The group may not be greater than 255 characters."))]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The label may not be greater than 255 characters."))]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    pub description: Option<String>,
}

impl From<SettingEntry> for SettingUpsert {
    fn from(entry: SettingEntry) -> Self {
        SettingUpsert {
            setting_type: entry.setting_type.as_deref().map(SettingType::from_name_lossy),
            key: entry.key,
            value: entry.value,
            group: entry.group,
            label: entry.label,
            description: entry.description,
        }
    }
}

/// Body for `PUT /settings/{key}`.
#[derive(Debug, Deserialize, Validate)]
pub struct SettingBody {
    #[serde(default)]
    #[validate(custom(function = "validate_filled"))]
    pub value: Value,
    #[serde(default, rename = "type", deserialize_with = "de::blank_as_none")]
    #[validate(custom(function = "validate_setting_type"))]
    pub setting_type: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The group may not be greater than 255 characters."))]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The label may not be greater than 255 characters."))]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    pub description: Option<String>,
}

impl SettingBody {
    fn into_upsert(self, key: String) -> SettingUpsert {
        SettingUpsert {
            key,
            value: self.value,
            setting_type: self.setting_type.as_deref().map(SettingType::from_name_lossy),
            group: self.group,
            label: self.label,
            description: self.description,
        }
    }
}

/// A bulk entry that was not applied.
#[derive(Debug, Serialize)]
pub struct BulkEntryError {
    /// Position of the entry in the request's `settings` array.
    pub index: usize,
    pub key: Option<String>,
    pub errors: FieldErrors,
}

/// Response for `PUT /settings`.
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub message: &'static str,
    pub data: Vec<SiteSettingResponse>,
    pub errors: Vec<BulkEntryError>,
}

fn validate_settings_list(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Null => Err(invalid("required", "The settings field is required.")),
        Value::Array(_) => Ok(()),
        _ => Err(invalid("array", "The settings must be an array.")),
    }
}

fn validate_filled(value: &Value) -> Result<(), ValidationError> {
    if is_filled(value) {
        Ok(())
    } else {
        Err(invalid("required", "The value field is required."))
    }
}

fn validate_setting_type(raw: &str) -> Result<(), ValidationError> {
    SettingType::from_name(raw)
        .map(|_| ())
        .map_err(|_| invalid("type", "The selected type is invalid."))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/settings
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SettingsIndexParams>,
) -> AppResult<Json<SettingsIndex>> {
    let group = normalize_term(params.group.as_deref());
    let settings = SiteSettingRepo::list(&state.pool, group.as_deref()).await?;

    let view = if params.flat.as_deref() == Some("true") {
        SettingsIndex::Flat(flat_view(&settings))
    } else {
        SettingsIndex::Grouped(grouped_view(&settings))
    };
    Ok(Json(view))
}

/// GET /api/settings/{key}
pub async fn show(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<SiteSettingResponse>> {
    let setting = SiteSettingRepo::find_by_key(&state.pool, &key)
        .await?
        .ok_or(AppError::Core(CoreError::KeyNotFound {
            entity: "SiteSetting",
            key,
        }))?;
    Ok(Json(setting.into()))
}

/// PUT /api/settings
///
/// Best-effort batch: invalid or failing entries are reported in `errors`
/// and the rest are still applied.
pub async fn bulk_update(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidJson(input): ValidJson<BulkSettingsRequest>,
) -> AppResult<Json<BulkUpdateResponse>> {
    let Value::Array(raw_entries) = input.settings else {
        return Err(AppError::field("settings", "The settings must be an array."));
    };

    let mut errors = Vec::new();
    let mut indices = Vec::new();
    let mut upserts = Vec::new();

    for (index, raw) in raw_entries.into_iter().enumerate() {
        let key = raw.get("key").and_then(Value::as_str).map(str::to_string);
        let entry = match serde_json::from_value::<SettingEntry>(raw) {
            Ok(entry) => entry,
            Err(e) => {
                let mut fields = FieldErrors::new();
                fields.insert("settings".into(), vec![format!("Invalid setting entry: {e}")]);
                errors.push(BulkEntryError { index, key, errors: fields });
                continue;
            }
        };
        if let Err(e) = entry.validate() {
            errors.push(BulkEntryError {
                index,
                key,
                errors: field_errors(&e),
            });
            continue;
        }
        indices.push(index);
        upserts.push(SettingUpsert::from(entry));
    }

    let results = SiteSettingRepo::bulk_upsert(&state.pool, &upserts).await;

    let mut data = Vec::with_capacity(results.len());
    for ((index, upsert), result) in indices.into_iter().zip(&upserts).zip(results) {
        match result {
            Ok(setting) => data.push(SiteSettingResponse::from(setting)),
            Err(_) => {
                let mut fields = FieldErrors::new();
                fields.insert("value".into(), vec!["The setting could not be saved.".into()]);
                errors.push(BulkEntryError {
                    index,
                    key: Some(upsert.key.clone()),
                    errors: fields,
                });
            }
        }
    }
    errors.sort_by_key(|e| e.index);

    tracing::info!(
        updated = data.len(),
        rejected = errors.len(),
        "Bulk settings update"
    );

    Ok(Json(BulkUpdateResponse {
        message: "Settings updated successfully",
        data,
        errors,
    }))
}

/// PUT /api/settings/{key}
pub async fn update_single(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
    ValidJson(input): ValidJson<SettingBody>,
) -> AppResult<Json<SiteSettingResponse>> {
    let setting = SiteSettingRepo::upsert(&state.pool, &input.into_upsert(key)).await?;
    tracing::info!(key = %setting.key, "Setting updated");
    Ok(Json(setting.into()))
}

//! Repository for the `site_settings` table.

use serde_json::Value;
use sqlx::PgPool;

use crate::models::site_setting::{stored_value, SettingUpsert, SiteSetting};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, key, value, setting_type, group_name, label, description, created_at, updated_at";

/// Typed key/value access to site settings.
pub struct SiteSettingRepo;

impl SiteSettingRepo {
    /// Find a setting by key.
    pub async fn find_by_key(pool: &PgPool, key: &str) -> Result<Option<SiteSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_settings WHERE key = $1");
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Typed value of `key`, or `default` when the key does not exist.
    pub async fn get_value(pool: &PgPool, key: &str, default: Value) -> Result<Value, sqlx::Error> {
        Ok(Self::find_by_key(pool, key)
            .await?
            .map(|s| s.typed_value())
            .unwrap_or(default))
    }

    /// All settings ordered by group then key, optionally limited to one group.
    pub async fn list(pool: &PgPool, group: Option<&str>) -> Result<Vec<SiteSetting>, sqlx::Error> {
        match group {
            Some(group) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM site_settings WHERE group_name = $1 ORDER BY key"
                );
                sqlx::query_as::<_, SiteSetting>(&query)
                    .bind(group)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM site_settings ORDER BY group_name, key");
                sqlx::query_as::<_, SiteSetting>(&query).fetch_all(pool).await
            }
        }
    }

    /// Write `value` to `key`, creating a `text` setting in the default group
    /// if the key does not exist yet.
    pub async fn set(pool: &PgPool, key: &str, value: Value) -> Result<SiteSetting, sqlx::Error> {
        Self::upsert(pool, &SettingUpsert::new(key, value)).await
    }

    /// Update an existing setting's value, or create it.
    ///
    /// An existing setting keeps its declared type and metadata; the value is
    /// encoded for that type. New settings take type, group and label from
    /// `input`, falling back to `text`, `general` and the key.
    pub async fn upsert(pool: &PgPool, input: &SettingUpsert) -> Result<SiteSetting, sqlx::Error> {
        if let Some(existing) = Self::find_by_key(pool, &input.key).await? {
            let query = format!(
                "UPDATE site_settings SET value = $2 WHERE key = $1 RETURNING {COLUMNS}"
            );
            let updated = sqlx::query_as::<_, SiteSetting>(&query)
                .bind(&input.key)
                .bind(stored_value(existing.kind(), &input.value))
                .fetch_optional(pool)
                .await?;
            if let Some(updated) = updated {
                return Ok(updated);
            }
        }

        let setting_type = input.resolved_type();
        // A concurrent insert of the same key turns into a value update.
        let query = format!(
            "INSERT INTO site_settings (key, value, setting_type, group_name, label, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(&input.key)
            .bind(stored_value(setting_type, &input.value))
            .bind(setting_type.as_str())
            .bind(input.resolved_group())
            .bind(input.resolved_label())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Apply each write independently, in order.
    ///
    /// A failing entry does not stop the rest; each entry's outcome is
    /// returned at its own position.
    pub async fn bulk_upsert(
        pool: &PgPool,
        inputs: &[SettingUpsert],
    ) -> Vec<Result<SiteSetting, sqlx::Error>> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = Self::upsert(pool, input).await;
            if let Err(ref e) = result {
                tracing::warn!(key = %input.key, error = %e, "Setting write failed");
            }
            results.push(result);
        }
        results
    }
}

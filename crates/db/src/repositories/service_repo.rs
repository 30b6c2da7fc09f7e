//! Repository for the `services` table.

use enki_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::service::{CreateService, Service, UpdateService};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, icon, features, is_active, display_order, created_at, updated_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateService) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (title, description, icon, features, is_active, display_order)
             VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb), COALESCE($5, true), COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.features.as_ref().map(Json))
            .bind(input.is_active)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find a service by its ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List services by display order then newest first.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Service>, sqlx::Error> {
        let active_clause = if active_only { " AND is_active = true" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM services WHERE deleted_at IS NULL{active_clause}
             ORDER BY display_order ASC, created_at DESC"
        );
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Update a service. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                features = COALESCE($5, features),
                is_active = COALESCE($6, is_active),
                display_order = COALESCE($7, display_order)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.features.as_ref().map(Json))
            .bind(input.is_active)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a service by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE services SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count live, active services.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM services WHERE deleted_at IS NULL AND is_active = true",
        )
        .fetch_one(pool)
        .await
    }
}

//! Repository for the `projects` table.

use enki_core::search::{ilike_any, like_pattern, PROJECT_SEARCH_COLUMNS};
use enki_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, client, date, video_url, \
                        thumbnail_url, display_order, is_featured, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (title, description, category, client, date, video_url, thumbnail_url,
                 display_order, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.client)
            .bind(input.date)
            .bind(&input.video_url)
            .bind(&input.thumbnail_url)
            .bind(input.display_order)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching `filter`, by display order then newest first.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut bind_idx = 1u32;

        if filter.category.is_some() {
            conditions.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.featured_only {
            conditions.push("is_featured = true".to_string());
        }
        if filter.search.is_some() {
            conditions.push(ilike_any(PROJECT_SEARCH_COLUMNS, bind_idx));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {} \
             ORDER BY display_order ASC, created_at DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, Project>(&query);
        if let Some(ref category) = filter.category {
            q = q.bind(category);
        }
        if let Some(ref term) = filter.search {
            q = q.bind(like_pattern(term));
        }
        q.fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                client = COALESCE($5, client),
                date = COALESCE($6, date),
                video_url = COALESCE($7, video_url),
                thumbnail_url = COALESCE($8, thumbnail_url),
                display_order = COALESCE($9, display_order),
                is_featured = COALESCE($10, is_featured)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.client)
            .bind(input.date)
            .bind(&input.video_url)
            .bind(&input.thumbnail_url)
            .bind(input.display_order)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project and detach its thumbnail.
    ///
    /// Returns `None` if no live row matched, otherwise the thumbnail URL the
    /// row held so the caller can remove the file.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Option<String>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "WITH old AS (
                SELECT id, thumbnail_url FROM projects
                WHERE id = $1 AND deleted_at IS NULL
                FOR UPDATE
             )
             UPDATE projects p SET deleted_at = NOW(), thumbnail_url = NULL
             FROM old WHERE p.id = old.id
             RETURNING old.thumbnail_url",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Count live projects.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await
    }

    /// The `limit` most recently created live projects.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE deleted_at IS NULL
             ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

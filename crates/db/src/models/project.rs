//! Project (portfolio item) entity model and DTOs.

use chrono::NaiveDate;
use enki_core::search::normalize_term;
use enki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// A project row from the `projects` table. Soft-deleted rows are never loaded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub client: Option<String>,
    pub date: NaiveDate,
    pub video_url: Option<String>,
    /// Public URL of the stored thumbnail, if one was uploaded.
    pub thumbnail_url: Option<String>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub client: Option<String>,
    pub date: NaiveDate,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Defaults to 0 if omitted.
    pub display_order: Option<i32>,
    /// Defaults to `false` if omitted.
    pub is_featured: Option<bool>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub date: Option<NaiveDate>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_featured: Option<bool>,
}

/// Filters for [`crate::repositories::ProjectRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Exact category match.
    pub category: Option<String>,
    pub featured_only: bool,
    /// Case-insensitive substring over title, description and client.
    pub search: Option<String>,
}

impl ProjectFilter {
    /// Build a filter from raw query values.
    ///
    /// A blank category or the literal `"all"` disables the category filter;
    /// a blank search term disables the search filter.
    pub fn new(category: Option<&str>, featured_only: bool, search: Option<&str>) -> Self {
        Self {
            category: normalize_term(category).filter(|c| c != ALL_CATEGORIES),
            featured_only,
            search: normalize_term(search),
        }
    }
}

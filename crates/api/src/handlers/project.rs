//! Handlers for the `/projects` resource.
//!
//! Writes accept JSON or a multipart form with an optional `thumbnail` image.
//! A new thumbnail replaces the previous file; the old file is removed only
//! after the row update succeeds.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use enki_core::error::CoreError;
use enki_core::types::DbId;
use enki_core::uploads::{validate_image, StoredFile, PROJECT_THUMBNAIL_DIR};
use enki_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use enki_db::repositories::ProjectRepo;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::de;
use crate::error::{AppError, AppResult};
use crate::extract::{FormInput, UploadedFile, FILE_FIELD};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;
use super::invalid;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListParams {
    pub category: Option<String>,
    /// Presence flag: any value limits the list to featured projects.
    pub featured: Option<String>,
    pub search: Option<String>,
}

/// Body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 255, message = "The title field is required and may not be greater than 255 characters."))]
    pub title: String,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 255, message = "The category field is required and may not be greater than 255 characters."))]
    pub category: String,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The client may not be greater than 255 characters."))]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(custom(function = "validate_required_date"))]
    pub date: String,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(url(message = "The video url must be a valid URL."))]
    pub video_url: Option<String>,
    #[serde(default, alias = "display_order", deserialize_with = "de::flexible_i32")]
    pub order: Option<i32>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_featured: Option<bool>,
}

/// Body for `PUT /projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The title may not be greater than 255 characters."))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The category may not be greater than 255 characters."))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The client may not be greater than 255 characters."))]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(url(message = "The video url must be a valid URL."))]
    pub video_url: Option<String>,
    #[serde(default, alias = "display_order", deserialize_with = "de::flexible_i32")]
    pub order: Option<i32>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_featured: Option<bool>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn validate_date(raw: &str) -> Result<(), ValidationError> {
    match parse_date(raw) {
        Some(_) => Ok(()),
        None => Err(invalid("date", "The date is not a valid date.")),
    }
}

fn validate_required_date(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(invalid("required", "The date field is required."));
    }
    validate_date(raw)
}

fn date_field(raw: &str) -> AppResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| AppError::field("date", "The date is not a valid date."))
}

// ---------------------------------------------------------------------------
// Thumbnail helpers
// ---------------------------------------------------------------------------

/// Validate and store an uploaded thumbnail.
async fn store_thumbnail(state: &AppState, file: &UploadedFile) -> AppResult<StoredFile> {
    let ext = validate_image(&file.filename, &file.data, state.config.max_upload_bytes)
        .map_err(|e| match e {
            CoreError::Validation(msg) => AppError::field(FILE_FIELD, msg),
            other => AppError::Core(other),
        })?;
    let stored = state
        .uploads
        .store(PROJECT_THUMBNAIL_DIR, &ext, &file.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store thumbnail: {e}")))?;
    tracing::debug!(path = %stored.relative_path, "Stored project thumbnail");
    Ok(stored)
}

async fn store_optional(state: &AppState, file: Option<&UploadedFile>) -> AppResult<Option<StoredFile>> {
    match file {
        Some(file) => Ok(Some(store_thumbnail(state, file).await?)),
        None => Ok(None),
    }
}

/// Remove a freshly stored thumbnail whose row write did not go through.
async fn discard(state: &AppState, stored: Option<&StoredFile>) {
    if let Some(stored) = stored {
        state.uploads.remove_by_url(&stored.public_url).await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<Project>>> {
    let filter = ProjectFilter::new(
        params.category.as_deref(),
        params.featured.is_some(),
        params.search.as_deref(),
    );
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    form: FormInput<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let FormInput { input, file } = form;
    let date = date_field(&input.date)?;
    let thumbnail = store_optional(&state, file.as_ref()).await?;

    let create = CreateProject {
        title: input.title,
        description: input.description,
        category: input.category,
        client: input.client,
        date,
        video_url: input.video_url,
        thumbnail_url: thumbnail.as_ref().map(|t| t.public_url.clone()),
        display_order: input.order,
        is_featured: input.is_featured,
    };

    match ProjectRepo::create(&state.pool, &create).await {
        Ok(project) => {
            tracing::info!(project_id = %project.id, "Project created");
            Ok((StatusCode::CREATED, Json(project)))
        }
        Err(e) => {
            discard(&state, thumbnail.as_ref()).await;
            Err(e.into())
        }
    }
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    form: FormInput<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let FormInput { input, file } = form;
    let not_found = || AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    });

    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    let date = input.date.as_deref().map(date_field).transpose()?;
    let thumbnail = store_optional(&state, file.as_ref()).await?;

    let update = UpdateProject {
        title: input.title,
        description: input.description,
        category: input.category,
        client: input.client,
        date,
        video_url: input.video_url,
        thumbnail_url: thumbnail.as_ref().map(|t| t.public_url.clone()),
        display_order: input.order,
        is_featured: input.is_featured,
    };

    let project = match ProjectRepo::update(&state.pool, id, &update).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            discard(&state, thumbnail.as_ref()).await;
            return Err(not_found());
        }
        Err(e) => {
            discard(&state, thumbnail.as_ref()).await;
            return Err(e.into());
        }
    };

    if thumbnail.is_some() {
        if let Some(old_url) = existing.thumbnail_url {
            state.uploads.remove_by_url(&old_url).await;
        }
    }

    tracing::info!(project_id = %project.id, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let thumbnail_url = ProjectRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if let Some(url) = thumbnail_url {
        state.uploads.remove_by_url(&url).await;
    }

    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(MessageResponse {
        message: "Project deleted successfully",
    }))
}

//! Handlers for the `/services` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use enki_core::error::CoreError;
use enki_core::types::DbId;
use enki_db::models::service::{CreateService, Service, UpdateService};
use enki_db::repositories::ServiceRepo;
use serde::Deserialize;
use validator::Validate;

use crate::de;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Query parameters for `GET /services`.
#[derive(Debug, Deserialize)]
pub struct ServiceListParams {
    /// Presence flag: any value limits the list to active services.
    pub active: Option<String>,
}

/// Body for `POST /services`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 255, message = "The title field is required and may not be greater than 255 characters."))]
    pub title: String,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 50, message = "The icon may not be greater than 50 characters."))]
    pub icon: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: Option<bool>,
    #[serde(default, alias = "display_order", deserialize_with = "de::flexible_i32")]
    pub order: Option<i32>,
}

/// Body for `PUT /services/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The title may not be greater than 255 characters."))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 50, message = "The icon may not be greater than 50 characters."))]
    pub icon: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: Option<bool>,
    #[serde(default, alias = "display_order", deserialize_with = "de::flexible_i32")]
    pub order: Option<i32>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Service",
        id,
    })
}

/// GET /api/services
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ServiceListParams>,
) -> AppResult<Json<Vec<Service>>> {
    let services = ServiceRepo::list(&state.pool, params.active.is_some()).await?;
    Ok(Json(services))
}

/// GET /api/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(service))
}

/// POST /api/services
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidJson(input): ValidJson<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let create = CreateService {
        title: input.title,
        description: input.description,
        icon: input.icon,
        features: input.features,
        is_active: input.is_active,
        display_order: input.order,
    };
    let service = ServiceRepo::create(&state.pool, &create).await?;
    tracing::info!(service_id = %service.id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/services/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateServiceRequest>,
) -> AppResult<Json<Service>> {
    let update = UpdateService {
        title: input.title,
        description: input.description,
        icon: input.icon,
        features: input.features,
        is_active: input.is_active,
        display_order: input.order,
    };
    let service = ServiceRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(service_id = %id, "Service updated");
    Ok(Json(service))
}

/// DELETE /api/services/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ServiceRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(service_id = %id, "Service deleted");
    Ok(Json(MessageResponse {
        message: "Service deleted successfully",
    }))
}

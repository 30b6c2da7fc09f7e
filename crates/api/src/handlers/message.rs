//! Admin handlers for `/messages` (contact form submissions).

use axum::extract::{Path, Query, State};
use axum::Json;
use enki_core::contact::{marks_read_on_view, MessageStatus, StatusUpdate};
use enki_core::error::CoreError;
use enki_core::pagination::{clamp_page, clamp_per_page, Page, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use enki_core::types::DbId;
use enki_db::models::contact_message::{ContactMessage, MessageFilter};
use enki_db::repositories::ContactMessageRepo;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::de;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;
use super::invalid;

/// Query parameters for `GET /messages`.
#[derive(Debug, Deserialize)]
pub struct MessageListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Body for `PATCH /messages/{id}/status`.
#[derive(Debug, Deserialize, Validate)]
pub struct StatusRequest {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    /// Absent keeps the stored note on a reset; `null` or blank clears it.
    #[serde(default, deserialize_with = "de::present_blank_as_none")]
    pub response_note: Option<Option<String>>,
}

fn validate_status(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(invalid("required", "The status field is required."));
    }
    MessageStatus::from_name(raw)
        .map(|_| ())
        .map_err(|_| invalid("status", "The selected status is invalid."))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContactMessage",
        id,
    })
}

/// GET /api/messages
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<MessageListParams>,
) -> AppResult<Json<Page<ContactMessage>>> {
    let page = clamp_page(params.page);
    let per_page = clamp_per_page(params.per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let filter = MessageFilter::new(params.status.as_deref(), params.search.as_deref());

    let (rows, total) = ContactMessageRepo::list(&state.pool, &filter, page, per_page).await?;
    Ok(Json(Page::new(rows, page, per_page, total)))
}

/// GET /api/messages/{id}
///
/// Viewing a `new` message marks it read.
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContactMessage>> {
    let message = ContactMessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !marks_read_on_view(&message.status) {
        return Ok(Json(message));
    }

    // Another viewer may have won the race; keep what we loaded then.
    let message = ContactMessageRepo::mark_read_if_new(&state.pool, id)
        .await?
        .unwrap_or(message);
    Ok(Json(message))
}

/// PATCH /api/messages/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<StatusRequest>,
) -> AppResult<Json<ContactMessage>> {
    let target = MessageStatus::from_name(&input.status)?;

    let updated = match StatusUpdate::plan(target, input.response_note) {
        StatusUpdate::MarkRead => ContactMessageRepo::mark_read(&state.pool, id).await?,
        StatusUpdate::MarkResponded { note } => {
            ContactMessageRepo::mark_responded(&state.pool, id, note.as_deref()).await?
        }
        StatusUpdate::Reset { status, note } => {
            let note = note.as_ref().map(Option::as_deref);
            ContactMessageRepo::reset_status(&state.pool, id, status, note).await?
        }
    };
    let message = updated.ok_or_else(|| not_found(id))?;

    tracing::info!(message_id = %id, status = %message.status, "Message status updated");
    Ok(Json(message))
}

/// DELETE /api/messages/{id}
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ContactMessageRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(message_id = %id, "Contact message deleted");
    Ok(Json(MessageResponse {
        message: "Contact message deleted successfully",
    }))
}

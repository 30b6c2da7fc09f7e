//! Public contact form submission.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use enki_db::models::contact_message::{ContactMessage, CreateContactMessage};
use enki_db::repositories::ContactMessageRepo;
use serde::Deserialize;
use validator::Validate;

use crate::de;
use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::response::MessageDataResponse;
use crate::state::AppState;

/// Body for `POST /contact`.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 255, message = "The name field is required and may not be greater than 255 characters."))]
    pub name: String,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(
        length(min = 1, max = 255, message = "The email field is required and may not be greater than 255 characters."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters."))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::blank_as_none")]
    #[validate(length(max = 255, message = "The company may not be greater than 255 characters."))]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(length(min = 1, max = 5000, message = "The message field is required and may not be greater than 5000 characters."))]
    pub message: String,
}

/// POST /api/contact
///
/// Store a submission and notify the admin in the background. Mail failures
/// never affect the response.
pub async fn store(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ContactRequest>,
) -> AppResult<(StatusCode, Json<MessageDataResponse<ContactMessage>>)> {
    let create = CreateContactMessage {
        name: input.name,
        email: input.email,
        phone: input.phone,
        company: input.company,
        message: input.message,
    };
    let message = ContactMessageRepo::create(&state.pool, &create).await?;
    tracing::info!(message_id = %message.id, "Contact message received");

    state.notifier.spawn_notify(message.clone());

    Ok((
        StatusCode::CREATED,
        Json(MessageDataResponse {
            message: "Message sent successfully",
            data: message,
        }),
    ))
}

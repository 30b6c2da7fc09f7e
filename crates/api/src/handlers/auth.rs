//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::Json;
use chrono::{TimeZone, Utc};
use enki_core::error::CoreError;
use enki_db::models::session::CreateSession;
use enki_db::models::user::AdminUserResponse;
use enki_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, hash_token, ADMIN_ROLE};
use crate::auth::password::verify_password;
use crate::de;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "de::trimmed")]
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: AdminUserResponse,
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid_credentials =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = %user.id, "Rejected login with wrong password");
        return Err(invalid_credentials());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let (token, claims) = generate_access_token(user.id, ADMIN_ROLE, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash: hash_token(&token),
            expires_at,
        },
    )
    .await?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    tracing::info!(user_id = %user.id, "Admin logged in");

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}

/// POST /api/auth/logout
///
/// Revoke the session behind the presented token. Other sessions stay live.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    SessionRepo::revoke(&state.pool, auth_user.session_id).await?;
    tracing::info!(user_id = %auth_user.user_id, "Admin logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<AdminUserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AdminUser",
            id: auth_user.user_id,
        }))?;
    Ok(Json(user.into()))
}

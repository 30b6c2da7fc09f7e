//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use enki_core::error::CoreError;
use enki_core::types::DbId;
use enki_db::repositories::SessionRepo;

use crate::auth::jwt::{hash_token, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token must carry a valid signature, must not be expired, and must
/// match a session that has not been revoked. Use this as an extractor
/// parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The admin's id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
    /// Session backing the presented token.
    pub session_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let session = SessionRepo::find_active_by_token_hash(&state.pool, &hash_token(token))
            .await?
            .filter(|s| s.user_id == claims.sub)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Session has been revoked or has expired".into(),
                ))
            })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            session_id: session.id,
        })
    }
}

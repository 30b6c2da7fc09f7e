//! Admin session model and DTOs.

use enki_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `admin_sessions` table.
///
/// One row per issued access token; the token itself is never stored.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new admin session.
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

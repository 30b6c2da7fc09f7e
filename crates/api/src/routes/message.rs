//! Route definitions for the `/messages` resource. Every route requires auth.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// GET    /               -> list
/// GET    /{id}           -> get_by_id (marks `new` messages read)
/// DELETE /{id}           -> delete
/// PATCH  /{id}/status    -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(message::list))
        .route("/{id}", get(message::get_by_id).delete(message::delete))
        .route("/{id}/status", patch(message::update_status))
}

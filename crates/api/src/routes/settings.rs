//! Route definitions for the `/settings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET /         -> index (`?group=`, `?flat=true`)
/// PUT /         -> bulk_update
/// GET /{key}    -> show
/// PUT /{key}    -> update_single
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::index).put(settings::bulk_update))
        .route("/{key}", get(settings::show).put(settings::update_single))
}

pub mod auth;
pub mod health;
pub mod message;
pub mod project;
pub mod service;
pub mod settings;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{contact, stats};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     logout (requires auth)
/// /auth/me                         current admin (requires auth)
///
/// /contact                         submit contact form (public)
/// /stats                           dashboard summary (public)
///
/// /projects                        list (public), create (auth)
/// /projects/{id}                   get (public), update, delete (auth)
///
/// /services                        list (public), create (auth)
/// /services/{id}                   get (public), update, delete (auth)
///
/// /messages                        paginated list (auth)
/// /messages/{id}                   get with read-on-view, delete (auth)
/// /messages/{id}/status            change status (auth)
///
/// /settings                        grouped or flat read (public), bulk upsert (auth)
/// /settings/{key}                  get (public), single upsert (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/contact", post(contact::store))
        .route("/stats", get(stats::dashboard))
        .nest("/projects", project::router())
        .nest("/services", service::router())
        .nest("/messages", message::router())
        .nest("/settings", settings::router())
}

//! Dashboard summary for the admin panel.

use axum::extract::State;
use axum::Json;
use enki_core::contact::MessageStatus;
use enki_db::models::contact_message::ContactMessage;
use enki_db::models::project::Project;
use enki_db::repositories::{ContactMessageRepo, ProjectRepo, ServiceRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Number of items in each "recent" list.
const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_projects: i64,
    /// Active services only.
    pub total_services: i64,
    pub total_messages: i64,
    /// Messages still in status `new`.
    pub unread_messages: i64,
    pub recent_projects: Vec<Project>,
    pub recent_messages: Vec<ContactMessage>,
}

/// GET /api/stats
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let pool = &state.pool;
    let (total_projects, total_services, total_messages, unread_messages) = tokio::try_join!(
        ProjectRepo::count(pool),
        ServiceRepo::count_active(pool),
        ContactMessageRepo::count(pool),
        ContactMessageRepo::count_by_status(pool, MessageStatus::New),
    )?;
    let (recent_projects, recent_messages) = tokio::try_join!(
        ProjectRepo::recent(pool, RECENT_LIMIT),
        ContactMessageRepo::recent(pool, RECENT_LIMIT),
    )?;

    Ok(Json(DashboardStats {
        total_projects,
        total_services,
        total_messages,
        unread_messages,
        recent_projects,
        recent_messages,
    }))
}

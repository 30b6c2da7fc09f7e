//! Service (agency offering) entity model and DTOs.

use enki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A service row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub title: String,
    pub description: String,
    /// Opaque key into the front end's icon set.
    pub icon: Option<String>,
    /// Feature bullet points, in display order.
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    /// Defaults to an empty list if omitted.
    pub features: Option<Vec<String>>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    /// Defaults to 0 if omitted.
    pub display_order: Option<i32>,
}

/// DTO for updating an existing service. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Replaces the whole list when present.
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

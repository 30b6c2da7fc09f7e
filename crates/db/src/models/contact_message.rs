//! Contact message entity model and DTOs.

use enki_core::search::normalize_term;
use enki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A contact message row from the `contact_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    /// One of `new`, `read`, `responded`.
    pub status: String,
    pub read_at: Option<Timestamp>,
    pub responded_at: Option<Timestamp>,
    pub response_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a public contact form submission. New messages always start as `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
}

/// Filters for [`crate::repositories::ContactMessageRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub status: Option<String>,
    /// Case-insensitive substring over name, email, company and message.
    pub search: Option<String>,
}

impl MessageFilter {
    pub fn new(status: Option<&str>, search: Option<&str>) -> Self {
        Self {
            status: normalize_term(status),
            search: normalize_term(search),
        }
    }
}

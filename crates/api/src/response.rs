//! Shared response envelope types for API handlers.
//!
//! Most endpoints return the bare resource. Deletes and a few writes wrap
//! their result with a human-readable `message`.

use serde::Serialize;

/// `{ "message": "..." }` body returned by deletes and logout.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `{ "message": "...", "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct MessageDataResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
}

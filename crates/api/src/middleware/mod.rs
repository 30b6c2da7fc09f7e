//! Authentication extractor.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated admin from a JWT Bearer
//!   token backed by a live session.

pub mod auth;

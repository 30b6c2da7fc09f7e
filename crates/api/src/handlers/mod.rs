//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `enki_db` and map errors via
//! [`crate::error::AppError`]. Write endpoints take an [`crate::middleware::auth::AuthUser`].

pub mod auth;
pub mod contact;
pub mod message;
pub mod project;
pub mod service;
pub mod settings;
pub mod stats;

use std::borrow::Cow;

use validator::ValidationError;

/// Build a [`ValidationError`] carrying a display message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

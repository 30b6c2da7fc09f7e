//! Request body extractors that validate before the handler runs.
//!
//! - [`ValidJson`] -- JSON body checked with `validator::Validate`.
//! - [`FormInput`] -- JSON *or* multipart body plus an optional uploaded file,
//!   for endpoints that accept an image alongside regular fields.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::Segment;
use validator::Validate;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// ValidJson
// ---------------------------------------------------------------------------

/// Drop-in replacement for `Json<T>` that also runs field validation.
///
/// A body that is not JSON is a 400. A known field holding the wrong type,
/// and failed validation, are 422s with per-field messages.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let value: T = from_body(raw)?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

// ---------------------------------------------------------------------------
// FormInput
// ---------------------------------------------------------------------------

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "thumbnail";

/// A file received in a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename (may be empty).
    pub filename: String,
    pub data: Vec<u8>,
}

/// Validated fields plus the optional file from the [`FILE_FIELD`] part.
///
/// JSON bodies never carry a file. In multipart bodies every other part is
/// read as text and blank parts are dropped.
pub struct FormInput<T> {
    pub input: T,
    pub file: Option<UploadedFile>,
}

impl<T, S> FromRequest<S> for FormInput<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let (fields, file) = if is_multipart {
            read_multipart(Multipart::from_request(req, state).await.map_err(|e| {
                AppError::BadRequest(e.body_text())
            })?)
            .await?
        } else {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            (value, None)
        };

        let input: T = from_body(fields)?;
        input.validate()?;
        Ok(FormInput { input, file })
    }
}

/// Deserialize a parsed body, reporting a mistyped field against its name.
///
/// Errors that cannot be pinned on a top-level field (a body that is not an
/// object, for one) stay a 400.
fn from_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    let is_object = body.is_object();
    serde_path_to_error::deserialize(body).map_err(|err| {
        let field = match err.path().iter().next() {
            Some(Segment::Map { key }) if is_object => Some(key.clone()),
            _ => None,
        };
        let inner = err.into_inner();
        match field {
            Some(field) => {
                AppError::field(&field, format!("The {field} field is invalid: {inner}"))
            }
            None => AppError::BadRequest(format!("Invalid request body: {inner}")),
        }
    })
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Value, Option<UploadedFile>), AppError> {
    let mut fields = Map::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == FILE_FIELD {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !data.is_empty() {
                file = Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                });
            }
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !text.trim().is_empty() {
                fields.insert(name, Value::String(text));
            }
        }
    }

    Ok((Value::Object(fields), file))
}

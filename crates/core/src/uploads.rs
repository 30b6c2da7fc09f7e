//! Thumbnail validation and the local public upload store.
//!
//! Uploaded files land under `<root>/<dir>/<uuid>.<ext>` and are addressed by
//! the public URL `<public_prefix>/<dir>/<uuid>.<ext>`. The URL recorded on a
//! row is the only link back to the file, so [`UploadStore::relative_path_for`]
//! maps it back to a path inside the root.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default maximum thumbnail size (5 MiB).
pub const DEFAULT_MAX_THUMBNAIL_BYTES: usize = 5 * 1024 * 1024;

/// Sub-directory for project thumbnails.
pub const PROJECT_THUMBNAIL_DIR: &str = "projects";

/// Extensions accepted for uploaded images.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an uploaded image and pick the extension to store it under.
///
/// The payload must be non-empty, at most `max_bytes`, sniff as PNG, JPEG,
/// GIF or WebP, and have a readable header. The client's extension is kept
/// when it is a supported one; otherwise the sniffed format's extension is
/// used.
pub fn validate_image(filename: &str, data: &[u8], max_bytes: usize) -> Result<String, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("The thumbnail file is empty".into()));
    }
    if data.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "The thumbnail may not be greater than {} kilobytes",
            max_bytes / 1024
        )));
    }

    let format = image::guess_format(data)
        .ok()
        .filter(|f| {
            matches!(
                f,
                ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
            )
        })
        .ok_or_else(|| CoreError::Validation("The thumbnail must be an image".into()))?;

    ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("The thumbnail could not be read: {e}")))?;

    let client_ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| SUPPORTED_IMAGE_EXTENSIONS.contains(&e.as_str()));

    Ok(client_ext.unwrap_or_else(|| {
        format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("bin")
            .to_string()
    }))
}

// ---------------------------------------------------------------------------
// UploadStore
// ---------------------------------------------------------------------------

/// A file written by [`UploadStore::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the store root, e.g. `projects/<uuid>.png`.
    pub relative_path: String,
    /// Public URL recorded on the owning row.
    pub public_url: String,
}

/// Local-disk public blob area.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    public_prefix: String,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Write `data` under `dir` with a freshly generated unique filename.
    pub async fn store(&self, dir: &str, ext: &str, data: &[u8]) -> std::io::Result<StoredFile> {
        let filename = format!("{}.{ext}", uuid::Uuid::new_v4());
        let target_dir = self.root.join(dir);
        tokio::fs::create_dir_all(&target_dir).await?;
        tokio::fs::write(target_dir.join(&filename), data).await?;

        let relative_path = format!("{dir}/{filename}");
        Ok(StoredFile {
            public_url: format!("{}/{relative_path}", self.public_prefix),
            relative_path,
        })
    }

    /// Map a public URL (absolute or path-only) back to a path relative to
    /// the root.
    ///
    /// Returns `None` for URLs outside the public prefix or paths that would
    /// escape the root.
    pub fn relative_path_for(&self, url: &str) -> Option<String> {
        let path = match url.find("://") {
            Some(scheme_end) => {
                let after_scheme = &url[scheme_end + 3..];
                &after_scheme[after_scheme.find('/')?..]
            }
            None => url,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let relative = path
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')?;

        let escapes = relative.is_empty()
            || relative.contains('\\')
            || relative.split('/').any(|seg| seg.is_empty() || seg == "..");
        if escapes {
            return None;
        }
        Some(relative.to_string())
    }

    /// Delete the file behind a public URL.
    ///
    /// Best-effort: failures are logged and reported as `false`, never
    /// returned as errors.
    pub async fn remove_by_url(&self, url: &str) -> bool {
        let Some(relative) = self.relative_path_for(url) else {
            tracing::warn!(url, "Refusing to remove upload outside the public storage area");
            return false;
        };
        match tokio::fs::remove_file(self.root.join(&relative)).await {
            Ok(()) => {
                tracing::debug!(path = %relative, "Removed stored upload");
                true
            }
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "Failed to remove stored upload");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

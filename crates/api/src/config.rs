use std::path::PathBuf;

use enki_core::uploads::DEFAULT_MAX_THUMBNAIL_BYTES;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Root directory of the public upload area.
    pub upload_dir: PathBuf,
    /// URL prefix the upload area is served under.
    pub public_storage_path: String,
    /// Maximum accepted thumbnail size in bytes.
    pub max_upload_bytes: usize,
    /// Recipient of new-message notifications; `None` disables them.
    pub admin_email: Option<String>,
    /// Base URL of the admin panel, used for deep links in notifications.
    pub admin_panel_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                       |
    /// |------------------------|-------------------------------|
    /// | `HOST`                 | `0.0.0.0`                     |
    /// | `PORT`                 | `8000`                        |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                          |
    /// | `UPLOAD_DIR`           | `storage/public`              |
    /// | `PUBLIC_STORAGE_PATH`  | `/storage`                    |
    /// | `MAX_UPLOAD_BYTES`     | `5242880`                     |
    /// | `ADMIN_EMAIL`          | unset                         |
    /// | `ADMIN_PANEL_URL`      | `http://localhost:3000/admin` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "storage/public".into())
            .into();

        let public_storage_path =
            std::env::var("PUBLIC_STORAGE_PATH").unwrap_or_else(|_| "/storage".into());

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_THUMBNAIL_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let admin_email = std::env::var("ADMIN_EMAIL")
            .ok()
            .filter(|e| !e.trim().is_empty());

        let admin_panel_url = std::env::var("ADMIN_PANEL_URL")
            .unwrap_or_else(|_| "http://localhost:3000/admin".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            upload_dir,
            public_storage_path,
            max_upload_bytes,
            admin_email,
            admin_panel_url,
        }
    }
}

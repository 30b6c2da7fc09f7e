//! First-run admin account creation.

use enki_db::models::user::CreateAdminUser;
use enki_db::repositories::UserRepo;
use enki_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Credentials for the bootstrap admin account.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl AdminSeed {
    /// Load the seed account from the environment.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `ADMIN_SEED_EMAIL`    | yes      |         |
    /// | `ADMIN_SEED_PASSWORD` | yes      |         |
    /// | `ADMIN_SEED_NAME`     | no       | `Admin` |
    ///
    /// Returns `None` unless both email and password are set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_SEED_EMAIL").ok()?;
        let password = std::env::var("ADMIN_SEED_PASSWORD").ok()?;
        Some(Self {
            email,
            password,
            name: std::env::var("ADMIN_SEED_NAME").unwrap_or_else(|_| "Admin".into()),
        })
    }
}

/// Create the seed admin if no admin account exists yet.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::BadRequest(format!("ADMIN_SEED_PASSWORD: {e}")))?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateAdminUser {
            name: seed.name.clone(),
            email: seed.email.trim().to_lowercase(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Created bootstrap admin account");
    Ok(true)
}

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enki_api::bootstrap::{ensure_admin, AdminSeed};
use enki_api::config::ServerConfig;
use enki_api::router::build_app_router;
use enki_api::state::AppState;
use enki_events::{ContactNotifier, EmailConfig, EmailDelivery, MailTransport};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enki_api=debug,enki_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = enki_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    enki_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    enki_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- First admin account ---
    if let Some(seed) = AdminSeed::from_env() {
        match ensure_admin(&pool, &seed).await {
            Ok(true) => tracing::info!(email = %seed.email, "Created initial admin account"),
            Ok(false) => tracing::debug!("Admin account already present, skipping seed"),
            Err(e) => tracing::warn!(error = %e, "Failed to seed admin account"),
        }
    }

    // --- Notifications ---
    let transport = EmailConfig::from_env().map(|cfg| {
        tracing::info!(host = %cfg.smtp_host, "SMTP delivery configured");
        Arc::new(EmailDelivery::new(cfg)) as Arc<dyn MailTransport>
    });
    let notifier = ContactNotifier::new(
        config.admin_email.clone(),
        config.admin_panel_url.clone(),
        transport,
    );
    if !notifier.is_enabled() {
        tracing::info!("Contact notifications disabled (ADMIN_EMAIL or SMTP_HOST unset)");
    }

    // --- App state + router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(pool, config.clone(), notifier);
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

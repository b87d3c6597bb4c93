use std::net::SocketAddr;
use std::sync::Arc;

use timekeeper_core::accounts::{AccountDeps, Mailer};
use timekeeper_core::memory::MemoryStores;
use timekeeper_core::store::Stores;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timekeeper_api::auth::password::Argon2Hasher;
use timekeeper_api::config::ServerConfig;
use timekeeper_api::notifications::mail::{EmailConfig, LogMailer, SmtpMailer};
use timekeeper_api::router::build_app_router;
use timekeeper_api::state::AppState;
use timekeeper_db::PgStores;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timekeeper_api=debug,timekeeper_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Account collaborators ---
    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(smtp_host = %email_config.smtp_host, "SMTP mail delivery enabled");
            Arc::new(SmtpMailer::new(email_config))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; account mails will be logged");
            Arc::new(LogMailer::default())
        }
    };
    let mut accounts = AccountDeps::new(Arc::new(Argon2Hasher), mailer);
    accounts.reset_token_lifetime = chrono::Duration::minutes(config.reset_token_lifetime_mins);

    // --- Stores ---
    match config.database_url.clone() {
        Some(database_url) => {
            let pool = timekeeper_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            timekeeper_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            timekeeper_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let stores = PgStores::new(pool.clone());
            serve(stores, accounts, config, Some(pool)).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data is kept in memory only");
            serve(MemoryStores::new(), accounts, config, None).await;
        }
    }
}

async fn serve<S: Stores>(
    stores: S,
    accounts: AccountDeps,
    config: ServerConfig,
    pool: Option<timekeeper_db::DbPool>,
) {
    let state = AppState {
        stores: Arc::new(stores),
        accounts,
        config: Arc::new(config.clone()),
        pool,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
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

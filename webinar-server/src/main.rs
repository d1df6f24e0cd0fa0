//! Webinar Registration Server
//!
//! Accepts webinar sign-ups, stores them, and emails the organisers and
//! the registrant.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use server::{build_router, cors_layer, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use webinar_core::framework::DatabaseProcessor;
use webinar_core::notifications::{NotificationSender, SendGridSender};
use webinar_core::service::RegistrationService;

/// Webinar registration backend
#[derive(Parser, Debug)]
#[command(name = "webinar-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./webinar-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:8001)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting webinar-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let loaded_config = ConfigLoader::new(&args.config, args.listen)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    let listen_addr = loaded_config.server.listen;

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    let store = Arc::new(DatabaseProcessor::new(db_pool));

    let sender = Arc::new(SendGridSender::new(&loaded_config.notifications));
    if let Err(e) = sender.ready() {
        tracing::warn!("Email notifications disabled: {}", e);
    }

    let service = RegistrationService::new(
        store.clone(),
        sender,
        loaded_config.notifications.admin_email.clone(),
    );
    let state = AppState::new(service, store.clone());

    // Build the router
    let router = build_router(state, cors_layer(&loaded_config.server.allowed_origins));

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Close database connections gracefully. Notification tasks still in
    // flight are dropped with the runtime.
    tracing::info!("Closing database connections...");
    store.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

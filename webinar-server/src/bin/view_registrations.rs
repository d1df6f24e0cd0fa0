//! Print every webinar registration straight from the database.
//!
//! Read-only; meant for operators without access to the admin dashboard.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use webinar_core::framework::DatabaseProcessor;
use webinar_core::report::RegistrationReport;
use webinar_core::store::{LIST_LIMIT, RegistrationStore};

#[derive(Parser, Debug)]
#[command(name = "view-registrations")]
#[command(version, about, long_about = None)]
struct Args {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&args.database_url)
        .await
        .map_err(|e| {
            tracing::error!(
                "Error accessing database: {}. Check that PostgreSQL is running and DATABASE_URL is correct.",
                e
            );
            e
        })?;
    let store = DatabaseProcessor::new(pool);

    let registrations = store.list_all(LIST_LIMIT).await;
    store.close().await;

    print!("{}", RegistrationReport::new(&registrations?));
    Ok(())
}

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, AUTH_* etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fleet_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = fleet_api::config::config();
    tracing::info!("Starting fleet-api in {:?} mode", config.environment);

    let cli = Cli::parse();
    cli::run(cli, config.clone()).await
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::app::app;
use crate::auth::JwksAuthenticator;
use crate::config::AppConfig;
use crate::database::{open_store, DocumentStore};
use crate::services::{ReconcileReport, RelationshipEngine};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "fleet-api")]
#[command(about = "Vessel and cargo tracking API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides PORT")]
        port: Option<u16>,

        #[arg(long, help = "Listen address, overrides HOST")]
        host: Option<String>,
    },

    #[command(about = "Repair one-sided vessel, cargo and user links, then exit")]
    Reconcile {
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None, host: None }) {
        Commands::Serve { port, host } => serve(config, host, port).await,
        Commands::Reconcile { json } => reconcile(config, json).await,
    }
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = open_store(&config.store).await.context("failed to open store")?;
    let authenticator = Arc::new(JwksAuthenticator::new(&config.auth));

    let interval = config.maintenance.reconcile_interval_secs;
    if interval > 0 {
        spawn_reconciler(store.clone(), Duration::from_secs(interval));
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(store, authenticator, config).context("invalid PUBLIC_BASE_URL")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("fleet-api listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

fn spawn_reconciler(store: Arc<dyn DocumentStore>, every: Duration) {
    tracing::info!("Reconciling links every {}s", every.as_secs());
    tokio::spawn(async move {
        let engine = RelationshipEngine::new(store);
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match engine.reconcile().await {
                Ok(report) => log_report(&report),
                Err(e) => tracing::error!("Reconciliation failed: {}", e),
            }
        }
    });
}

async fn reconcile(config: AppConfig, json: bool) -> anyhow::Result<()> {
    let store = open_store(&config.store).await.context("failed to open store")?;
    let report = RelationshipEngine::new(store)
        .reconcile()
        .await
        .context("reconciliation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        log_report(&report);
        println!(
            "vessels repaired: {}\ncargo repaired: {}\nusers repaired: {}\norphaned vessels: {:?}",
            report.vessels_repaired, report.cargo_repaired, report.users_repaired, report.orphaned_vessels
        );
    }
    Ok(())
}

fn log_report(report: &ReconcileReport) {
    if report.is_clean() {
        tracing::info!("Reconciliation found nothing to repair");
    } else {
        tracing::warn!(
            "Reconciliation repaired {} vessels, {} cargo items, {} users; {} vessels have no owner record",
            report.vessels_repaired,
            report.cargo_repaired,
            report.users_repaired,
            report.orphaned_vessels.len()
        );
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workorders_core::AppConfig;
use workorders_web::{ServerConfig, start_server};

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "WORKORDERS_LOG";

#[derive(Debug, Parser)]
#[command(name = "workorders-web")]
#[command(about = "Browser UI for the work order tracker")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database file (default: ./workorders.db).
    #[arg(long)]
    db: Option<PathBuf>,
    /// Path to a YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on (default: 127.0.0.1:8501).
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;

    start_server(ServerConfig {
        bind: cli.bind.unwrap_or_else(|| config.web.bind.clone()),
        db_path: config.resolve_database(cli.db.as_deref()),
    })
    .await
}

//! coinhub backend: entry point.

use anyhow::Result;
use clap::Parser;
use coinhub_server::{AppConfig, Application};
use tracing::info;

/// Sandbox fintech backend: accounts, transfers, savings, delayed-feed
/// coin trading.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via COINHUB_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;
    coinhub_telemetry::init_logging(
        config.telemetry.log_format.into(),
        &config.telemetry.log_filter,
    )?;

    info!("Starting coinhub v{}", env!("CARGO_PKG_VERSION"));
    info!(listen_addr = %config.listen_addr, provider = ?config.price.provider, "Configuration loaded");

    let app = Application::new(config)?;
    app.run().await?;

    Ok(())
}

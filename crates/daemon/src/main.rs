//! Coffee Cart Daemon
//!
//! Reads one JSON command per stdin line and answers with one JSON response
//! per stdout line. Logs go to stderr.

use clap::Parser;
use coffeecart_daemon::{handle_line, DaemonConfig, StateManager};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "coffeecartd")]
#[command(about = "Coffee Cart daemon - session-scoped cart, promotion and checkout engine")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "COFFEECART_CONFIG")]
    config: Option<PathBuf>,

    /// Ordinary additions per promotion offer
    #[arg(long)]
    threshold: Option<u32>,

    /// How long the purchase confirmation stays visible, in milliseconds
    #[arg(long)]
    confirmation_ttl_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    info!("Coffee Cart daemon v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, then apply command-line overrides
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::load(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.promotion.threshold = threshold;
    }
    if let Some(ttl) = cli.confirmation_ttl_ms {
        config.checkout.confirmation_ttl_ms = ttl;
    }

    let state = StateManager::new(&config)?;
    info!(
        "Session ready: {} menu items, promotion every {} additions",
        state.with_storefront(|s| s.catalog().len()),
        config.promotion.threshold
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };

                let response = handle_line(&state, &line);
                let mut json = serde_json::to_string(&response)?;
                json.push('\n');
                stdout.write_all(json.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
    }

    info!("Daemon shutdown complete");
    Ok(())
}

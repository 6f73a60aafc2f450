//! # DueNote — deadline notes that expire on their own
//!
//! Usage:
//!   duenote                          # Serve on the configured address (default 127.0.0.1:5000)
//!   duenote --port 8080              # Custom port
//!   duenote --config ./duenote.toml  # Explicit config file

use anyhow::Result;
use clap::Parser;
use duenote_core::DueNoteConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "duenote",
    version,
    about = "⏰ DueNote — in-memory notes that expire at their deadline"
)]
struct Cli {
    /// Config file (default: ~/.duenote/config.toml)
    #[arg(short, long, env = "DUENOTE_CONFIG")]
    config: Option<String>,

    /// Bind address, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "duenote=debug,duenote_gateway=debug,duenote_scheduler=debug,tower_http=debug"
    } else {
        "duenote=info,duenote_gateway=info,duenote_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref().map(expand_path);
    let mut config = DueNoteConfig::resolve(config_path.as_deref())?;
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    tracing::info!(
        "⏰ DueNote v{} (body limit {} bytes, payload limit {} chars)",
        env!("CARGO_PKG_VERSION"),
        config.gateway.max_body_bytes,
        config.notes.max_payload_chars
    );

    duenote_gateway::start(&config).await
}

//! # CLI
//!
//! Argument parsing and server startup. `main` delegates here; this module
//! loads the configuration file, applies any command-line overrides, wires
//! up the session and state, and runs the server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::GatewayConfig;
use crate::http_server::{ApiState, HttpServer};
use crate::session::{ConfigSession, ShellSession};

#[derive(Debug, Parser)]
#[command(name = "confgate", about = "HTTP gateway for the configuration-session engine")]
struct Cli {
    /// Path to the gateway configuration file
    #[arg(short, long, default_value = "/etc/confgate/config.json")]
    config: PathBuf,

    /// Override the configured listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

/// Parse arguments, load configuration, and run the server
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = GatewayConfig::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }

    init_tracing(config.debug);

    if config.api_keys.is_empty() {
        tracing::warn!("no API keys provisioned; every request will be rejected");
    }

    let session: Arc<dyn ConfigSession> =
        Arc::new(ShellSession::new(config.session.clone()));
    let state = Arc::new(ApiState::new(config, session));
    HttpServer::new(state).start().await?;
    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "confgate=debug,tower_http=debug" } else { "confgate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

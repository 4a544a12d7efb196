//! Oink demo server.
//!
//! Serves a small Axum application wrapped in the Oink layer so the log
//! output of each supported routing shape can be inspected:
//!
//! ```text
//! GET /users/{id}                    modern dispatch
//! GET /legacy/{controller}/{action}  legacy dispatch
//! GET /api/v1/status                 API endpoint
//! GET /                              unrecognised, no routing lines
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use oink::config::{load_config, OinkConfig};
use oink::observability::logging;
use oink::{HttpServer, OinkLayer};

#[derive(Parser)]
#[command(name = "oink")]
#[command(about = "Demo server instrumented with the Oink layer", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => OinkConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!(
        config = ?cli.config,
        path = config.middleware.path,
        instruments = ?config.middleware.instruments,
        counter_scope = ?config.middleware.counter_scope,
        log_sink = ?config.log.sink,
        "Configuration loaded"
    );

    let layer = OinkLayer::from_config(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    HttpServer::new(layer).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

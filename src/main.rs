//! Tron resource rental service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (axum) ──▶ rental::RentalService
//!                                         │
//!                                         ├──▶ quoting::FeeCalculator
//!                                         │        (stake + four fee getters)
//!                                         ▼
//!                                  blockchain::ContractCaller
//!                                         │  trigger → stamp → sign
//!                                         ▼
//!                                  TronTransport (HTTP full node)
//!     Client Response                     │
//!     ◀────────────── envelope ◀──────────┘ broadcast result
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use tron_rental::blockchain::HttpTransport;
use tron_rental::config::load_config;
use tron_rental::lifecycle::{spawn_signal_listener, Shutdown};
use tron_rental::observability::{logging, metrics};
use tron_rental::{HttpServer, RentalService};

#[derive(Parser)]
#[command(name = "tron-rental")]
#[command(about = "Tron energy and bandwidth rental service", version)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("tron-rental v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.tron.rpc_url,
        contract = %config.rental.contract_address,
        strict_fee_queries = config.rental.strict_fee_queries,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let transport = Arc::new(HttpTransport::new(config.tron.clone())?);
    let service = RentalService::new(transport, &config.rental)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, service);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

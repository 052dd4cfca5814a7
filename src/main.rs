//! Contract value sync service.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!   HTTP request   │  ┌────────┐    ┌──────────────────────────┐   │
//!  ────────────────┼─▶│  http  │───▶│  service (reconcile)     │   │
//!                  │  └────────┘    └───┬─────────┬─────────┬──┘   │
//!                  │                    │         │         │      │
//!                  │                    ▼         ▼         ▼      │
//!                  │              ┌─────────┐ ┌───────┐ ┌────────┐ │
//!                  │              │ client  │ │storage│ │ wallet │ │
//!                  │              └────┬────┘ └───┬───┘ └────────┘ │
//!                  └───────────────────┼──────────┼───────────────┘
//!                                      ▼          ▼
//!                                 JSON-RPC     SQL database
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use contract_sync::config::{load_config, load_dotenv, DOTENV_FILE};
use contract_sync::lifecycle::{bootstrap, signals, Shutdown};
use contract_sync::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "contract-sync")]
#[command(
    about = "Keeps a database copy of a contract value in sync with the chain",
    long_about = None
)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "CONTRACT_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Dotenv file exported before the environment is read.
    #[arg(long, env = "CONTRACT_SYNC_ENV_FILE", default_value = DOTENV_FILE)]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let dotenv = load_dotenv(&args.env_file);

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("contract-sync v{} starting", env!("CARGO_PKG_VERSION"));

    match dotenv {
        Ok(true) => tracing::info!(path = %args.env_file.display(), "Loaded environment file"),
        Ok(false) => tracing::debug!(path = %args.env_file.display(), "No environment file"),
        Err(e) => tracing::warn!(error = %e, "Ignoring environment file"),
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        contract = %config.contract.contract_name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = match bootstrap(config, None).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let listener = match app.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let stopped = shutdown.notified();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    if let Err(e) = app.serve(listener, stopped).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the signer key
//! - Initialize chain client and value store in dependency order
//! - Assemble the service and hand it to the HTTP server
//! - Close the store once the server has drained
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::blockchain::{BlockchainError, KeyError, Signer, SimpleStorageClient};
use crate::config::{AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::service::ContractService;
use crate::storage::{SqlValueStore, StoreError};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("blockchain error: {0}")]
    Chain(#[from] BlockchainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fully initialized service, ready to serve.
pub struct Application {
    config: AppConfig,
    service: Arc<ContractService>,
}

impl Application {
    /// Assemble from already-constructed parts.
    pub fn new(config: AppConfig, service: Arc<ContractService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn service(&self) -> Arc<ContractService> {
        self.service.clone()
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let address = self.config.server.bind_address.clone();
        TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })
    }

    /// Serve until `shutdown` resolves, then close the store.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = HttpServer::new(
            self.service.clone(),
            &self.config.server,
            self.config.timeouts.clone(),
        );
        let result = server.run(listener, shutdown).await;
        self.service.shutdown().await;
        result
    }
}

/// Build every subsystem from configuration.
///
/// The signer key comes from `key_source` when given, otherwise from
/// `BESU_TRANSACTOR_PRIVATE_KEY`.
pub async fn bootstrap(
    config: AppConfig,
    key_source: Option<&str>,
) -> Result<Application, StartupError> {
    let signer = match key_source {
        Some(raw) => Signer::load(Some(raw))?,
        None => Signer::from_env()?,
    };
    tracing::info!(address = %signer.address(), "Transactor address loaded");

    let contract = SimpleStorageClient::connect(&config.blockchain, &config.contract).await?;
    let store = SqlValueStore::connect(&config.database).await?;

    let service = ContractService::new(Arc::new(contract), Arc::new(store), signer);
    Ok(Application::new(config, Arc::new(service)))
}

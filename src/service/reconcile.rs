//! Reconciliation service.

use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::{BlockchainError, ContractClient, Signer};
use crate::observability::metrics;
use crate::storage::{StoreError, ValueStore, CONTRACT_VALUE_KEY};

/// Errors surfaced by reconciliation operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A chain read or write failed.
    #[error("{context}: {source}")]
    Chain {
        context: String,
        #[source]
        source: BlockchainError,
    },

    /// A store read or write failed.
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

/// Result of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub network_value: U256,
    pub database_value: U256,
    /// Whether the store was overwritten.
    pub updated: bool,
}

/// Result of a read-only comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub matches: bool,
    pub network_value: U256,
    pub database_value: U256,
}

/// Orchestrates the contract client, the value store and the signer.
pub struct ContractService {
    contract: Arc<dyn ContractClient>,
    store: Arc<dyn ValueStore>,
    signer: Signer,
    key: String,
}

impl ContractService {
    /// Create a service tracking the default contract value key.
    pub fn new(
        contract: Arc<dyn ContractClient>,
        store: Arc<dyn ValueStore>,
        signer: Signer,
    ) -> Self {
        Self::with_key(contract, store, signer, CONTRACT_VALUE_KEY)
    }

    /// Create a service tracking `key` in the store.
    pub fn with_key(
        contract: Arc<dyn ContractClient>,
        store: Arc<dyn ValueStore>,
        signer: Signer,
        key: impl Into<String>,
    ) -> Self {
        Self {
            contract,
            store,
            signer,
            key: key.into(),
        }
    }

    /// Address of the held signer.
    pub fn transactor_address(&self) -> Address {
        self.signer.address()
    }

    /// Current network value and the transactor address.
    pub async fn get_current_value(&self) -> Result<(U256, Address), ServiceError> {
        let value = self
            .contract
            .read_value()
            .await
            .map_err(|source| ServiceError::Chain {
                context: "failed to read contract value".to_string(),
                source,
            })?;
        Ok((value, self.signer.address()))
    }

    /// Submit a transaction setting the contract value. The store is not touched.
    pub async fn set_new_value(&self, value: U256) -> Result<TxHash, ServiceError> {
        self.contract
            .write_value(value, &self.signer)
            .await
            .map_err(|source| ServiceError::Chain {
                context: format!("failed to set contract value to {}", value),
                source,
            })
    }

    /// Overwrite the persisted value with the network value when they differ.
    pub async fn sync_contract_value(&self) -> Result<SyncOutcome, ServiceError> {
        let (network_value, database_value) = self.read_both("sync").await?;

        if network_value == database_value {
            tracing::info!(
                key = %self.key,
                value = %network_value,
                "Network and database values already match"
            );
            return Ok(SyncOutcome {
                network_value,
                database_value,
                updated: false,
            });
        }

        tracing::info!(
            key = %self.key,
            network_value = %network_value,
            database_value = %database_value,
            "Network value differs from database, updating database"
        );

        self.store
            .save(&self.key, network_value)
            .await
            .map_err(|source| ServiceError::Store {
                context: format!(
                    "failed to save value {} during sync (key {})",
                    network_value, self.key
                ),
                source,
            })?;
        metrics::record_sync_write();

        Ok(SyncOutcome {
            network_value,
            database_value: network_value,
            updated: true,
        })
    }

    /// Compare network and persisted values without writing.
    pub async fn check_contract_value(&self) -> Result<CheckOutcome, ServiceError> {
        let (network_value, database_value) = self.read_both("check").await?;
        Ok(CheckOutcome {
            matches: network_value == database_value,
            network_value,
            database_value,
        })
    }

    async fn read_both(&self, operation: &str) -> Result<(U256, U256), ServiceError> {
        let network_value = self
            .contract
            .read_value()
            .await
            .map_err(|source| ServiceError::Chain {
                context: format!("failed to read network value for {}", operation),
                source,
            })?;

        let database_value = self
            .store
            .get(&self.key)
            .await
            .map_err(|source| ServiceError::Store {
                context: format!(
                    "failed to read database value for {} (key {})",
                    operation, self.key
                ),
                source,
            })?;

        Ok((network_value, database_value))
    }

    /// Chain and store reachability.
    pub async fn health(&self) -> (bool, bool) {
        let chain = self.contract.is_healthy().await;
        let database = self.store.health_check().await.is_ok();
        (chain, database)
    }

    /// Close long-lived resources.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

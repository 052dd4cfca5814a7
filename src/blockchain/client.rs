//! Contract client over JSON-RPC.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint and resolve the chain ID once
//! - Read the stored integer through a read-only `eth_call`
//! - Build, sign and submit `set` transactions
//! - Provide health check for blockchain connectivity

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::artifacts::{load_contract_address, ContractInterface};
use crate::blockchain::transaction::PendingTransaction;
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Signer;
use crate::config::ContractConfig;

/// Read/write access to the contract-stored integer.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Current value held by the contract.
    async fn read_value(&self) -> BlockchainResult<U256>;

    /// Submit `set(value)` signed by `signer`. Returns once the node accepts it.
    async fn write_value(&self, value: U256, signer: &Signer) -> BlockchainResult<TxHash>;

    /// Whether the RPC endpoint answers.
    async fn is_healthy(&self) -> bool;
}

/// JSON-RPC client bound to one deployed storage contract.
#[derive(Clone)]
pub struct SimpleStorageClient {
    provider: Arc<dyn Provider + Send + Sync>,
    interface: ContractInterface,
    contract_address: Address,
    chain_id: ChainId,
    rpc_url: String,
}

impl SimpleStorageClient {
    /// Load artifacts, connect and resolve the chain ID.
    ///
    /// # Errors
    /// `ArtifactLoad` if either artifact is unreadable or malformed,
    /// `ChainInit` if the URL is invalid or the chain ID cannot be fetched.
    pub async fn connect(
        blockchain: &BlockchainConfig,
        contract: &ContractConfig,
    ) -> BlockchainResult<Self> {
        let interface = ContractInterface::load(Path::new(&contract.abi_path))?;
        let contract_address =
            load_contract_address(Path::new(&contract.addresses_path), &contract.contract_name)?;

        let url: url::Url = blockchain.rpc_url.parse().map_err(|e| {
            BlockchainError::ChainInit(format!("Invalid RPC URL '{}': {}", blockchain.rpc_url, e))
        })?;
        let provider = Arc::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>;

        let init_timeout = Duration::from_secs(blockchain.init_timeout_secs);
        let chain_id = match timeout(init_timeout, provider.get_chain_id()).await {
            Ok(Ok(id)) => ChainId(id),
            Ok(Err(e)) => {
                return Err(BlockchainError::ChainInit(format!(
                    "failed to fetch chain ID from {}: {}",
                    blockchain.rpc_url, e
                )))
            }
            Err(_) => {
                return Err(BlockchainError::ChainInit(format!(
                    "chain ID request to {} timed out after {}s",
                    blockchain.rpc_url, blockchain.init_timeout_secs
                )))
            }
        };

        tracing::info!(
            rpc_url = %blockchain.rpc_url,
            chain_id = chain_id.0,
            contract = %contract.contract_name,
            address = %contract_address,
            "Blockchain client initialized"
        );

        Ok(Self {
            provider,
            interface,
            contract_address,
            chain_id,
            rpc_url: blockchain.rpc_url.clone(),
        })
    }

    /// Chain ID resolved at initialization.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Deployed contract address.
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    async fn build_pending(
        &self,
        value: U256,
        from: Address,
    ) -> BlockchainResult<PendingTransaction> {
        let input = self.interface.encode_set(value)?;

        let nonce = self
            .provider
            .get_transaction_count(from)
            .pending()
            .await
            .map_err(|e| {
                BlockchainError::ChainWrite(format!(
                    "failed to fetch nonce for account {}: {}",
                    from, e
                ))
            })?;

        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| BlockchainError::ChainWrite(format!("failed to fetch gas price: {}", e)))?;

        Ok(PendingTransaction::new(
            self.contract_address,
            value,
            Bytes::from(input),
            nonce,
            gas_price,
            self.chain_id,
        ))
    }
}

#[async_trait]
impl ContractClient for SimpleStorageClient {
    async fn read_value(&self) -> BlockchainResult<U256> {
        let call = TransactionRequest::default()
            .with_to(self.contract_address)
            .with_input(Bytes::from(self.interface.encode_get()?));

        let output = self.provider.call(call).await.map_err(|e| {
            BlockchainError::ChainRead(format!(
                "call to 'get' on {} failed: {}",
                self.contract_address, e
            ))
        })?;

        let value = self.interface.decode_get(&output)?;
        tracing::debug!(value = %value, "Read contract value");
        Ok(value)
    }

    async fn write_value(&self, value: U256, signer: &Signer) -> BlockchainResult<TxHash> {
        let pending = self.build_pending(value, signer.address()).await?;
        let envelope = pending.sign(signer).await?;
        let expected_hash = *envelope.tx_hash();

        tracing::debug!(
            nonce = pending.nonce,
            gas_price = pending.gas_price,
            "Submitting set transaction"
        );

        let submitted = self.provider.send_tx_envelope(envelope).await.map_err(|e| {
            BlockchainError::ChainWrite(format!(
                "node rejected 'set({})' with nonce {}: {}",
                value, pending.nonce, e
            ))
        })?;
        let tx_hash = *submitted.tx_hash();

        if tx_hash != expected_hash {
            tracing::warn!(
                expected = %expected_hash,
                returned = %tx_hash,
                "Node returned a different transaction hash"
            );
        }

        tracing::info!(
            tx_hash = %tx_hash,
            value = %value,
            nonce = pending.nonce,
            from = %signer.address(),
            "Transaction submitted"
        );
        Ok(tx_hash)
    }

    async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}

impl std::fmt::Debug for SimpleStorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleStorageClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("contract_address", &self.contract_address)
            .finish()
    }
}

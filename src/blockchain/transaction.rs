//! Transaction building and signing.
//!
//! # Responsibilities
//! - Assemble the outbound `set` transaction from chain-queried inputs
//! - Sign it locally with the service signer
//!
//! # Design Decisions
//! - Legacy (EIP-155) transaction with node-suggested gas price
//! - Gas limit is fixed, never estimated
//! - No confirmation monitoring: the hash is the terminal artifact

use alloy::consensus::TxEnvelope;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, SET_GAS_LIMIT};
use crate::blockchain::wallet::Signer;

/// A state-mutation request that lives only until submission.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    /// Contract address.
    pub to: Address,
    /// Value being written to the contract.
    pub target_value: U256,
    /// ABI-encoded `set(target_value)`.
    pub input: Bytes,
    /// Next pending nonce of the signer.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Chain ID resolved at client initialization.
    pub chain_id: ChainId,
}

impl PendingTransaction {
    /// Create a transaction with the fixed gas limit.
    pub fn new(
        to: Address,
        target_value: U256,
        input: Bytes,
        nonce: u64,
        gas_price: u128,
        chain_id: ChainId,
    ) -> Self {
        Self {
            to,
            target_value,
            input,
            nonce,
            gas_price,
            gas_limit: SET_GAS_LIMIT,
            chain_id,
        }
    }

    /// Convert into an RPC transaction request sent from `from`.
    pub fn to_request(&self, from: Address) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.to)
            .with_value(U256::ZERO)
            .with_input(self.input.clone())
            .with_nonce(self.nonce)
            .with_gas_price(self.gas_price)
            .with_gas_limit(self.gas_limit)
            .with_chain_id(self.chain_id.0)
    }

    /// Sign with the given signer, producing a ready-to-broadcast envelope.
    pub async fn sign(&self, signer: &Signer) -> BlockchainResult<TxEnvelope> {
        let wallet = signer.wallet();
        self.to_request(signer.address())
            .build(&wallet)
            .await
            .map_err(|e| {
                BlockchainError::ChainWrite(format!(
                    "failed to sign 'set({})' transaction with nonce {}: {}",
                    self.target_value, self.nonce, e
                ))
            })
    }
}

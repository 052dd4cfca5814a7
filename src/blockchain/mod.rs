//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → wallet.rs (key loading, address derivation)
//! Contract artifacts (ABI, deployment map)
//!     → artifacts.rs (function resolution, named address lookup)
//! client.rs (RPC connection, chain ID, eth_call)
//!     → transaction.rs (build, sign) → eth_sendRawTransaction
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - Startup fails fast when artifacts or the chain ID are unavailable

pub mod artifacts;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ContractClient, SimpleStorageClient};
pub use transaction::PendingTransaction;
pub use types::{BlockchainConfig, BlockchainError, ChainId, KeyError};
pub use wallet::Signer;

//! Chain-specific types and error definitions.

use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Gas limit attached to every `set` transaction.
pub const SET_GAS_LIMIT: u64 = 300_000;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Contract ABI or deployment map could not be loaded.
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    /// RPC endpoint unusable at startup (bad URL, chain ID unavailable).
    #[error("Chain init error: {0}")]
    ChainInit(String),

    /// Read-only contract call failed or returned an unexpected shape.
    #[error("Chain read error: {0}")]
    ChainRead(String),

    /// Building, signing or submitting a transaction failed.
    #[error("Chain write error: {0}")]
    ChainWrite(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Errors raised while loading the signer key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No key was supplied.
    #[error("Private key missing: {0}")]
    Missing(String),

    /// The supplied key is not a valid secp256k1 secret.
    #[error("Invalid private key format: {0}")]
    Format(String),

    /// Derived public key is unusable. Unreachable for a loaded key.
    #[error("Internal key error: {0}")]
    Internal(String),
}

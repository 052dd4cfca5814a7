//! Signer identity held by the service.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized; `Debug` prints the address only

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::KeyError;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "BESU_TRANSACTOR_PRIVATE_KEY";

/// Account that signs `set` transactions.
#[derive(Clone)]
pub struct Signer {
    inner: PrivateKeySigner,
}

impl Signer {
    /// Load a signer from an optional hex key (with or without `0x`).
    pub fn load(source: Option<&str>) -> Result<Self, KeyError> {
        let raw = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| KeyError::Missing("no private key supplied".to_string()))?;

        let key_hex = raw.strip_prefix("0x").unwrap_or(raw);

        let inner: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| KeyError::Format(format!("cannot decode hex secp256k1 key: {}", e)))?;

        Ok(Self { inner })
    }

    /// Load from `BESU_TRANSACTOR_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, KeyError> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Load from the named environment variable.
    pub fn from_env_var(var: &str) -> Result<Self, KeyError> {
        match std::env::var(var) {
            Ok(value) => Self::load(Some(&value)).map_err(|e| match e {
                KeyError::Missing(_) => {
                    KeyError::Missing(format!("environment variable {} is empty", var))
                }
                other => other,
            }),
            Err(_) => Err(KeyError::Missing(format!("environment variable {} not set", var))),
        }
    }

    /// Address derived from the key. Pure and deterministic.
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Wallet used to sign transaction envelopes.
    pub(crate) fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.inner.clone())
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

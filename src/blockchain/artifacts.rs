//! Contract artifact loading.
//!
//! # Responsibilities
//! - Parse the compiled contract artifact (`{"abi": [...]}`) and resolve the
//!   `get`/`set` functions used by the client
//! - Resolve the deployed address from the deployment map by explicit name
//!
//! # Design Decisions
//! - Every failure here is fatal at startup (`ArtifactLoad`)
//! - A deployment map with several entries is never guessed from; the
//!   configured contract name must be present

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

const GETTER: &str = "get";
const SETTER: &str = "set";

#[derive(Deserialize)]
struct CompiledArtifact {
    abi: JsonAbi,
}

/// The resolved accessor and mutator of the storage contract.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    getter: Function,
    setter: Function,
}

impl ContractInterface {
    /// Load from a compiled artifact file.
    pub fn load(path: &Path) -> BlockchainResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            BlockchainError::ArtifactLoad(format!("cannot read ABI file {}: {}", path.display(), e))
        })?;
        Self::from_artifact_json(&raw)
            .map_err(|e| BlockchainError::ArtifactLoad(format!("{} ({})", e, path.display())))
    }

    /// Parse the artifact body.
    pub fn from_artifact_json(raw: &str) -> BlockchainResult<Self> {
        let artifact: CompiledArtifact = serde_json::from_str(raw).map_err(|e| {
            BlockchainError::ArtifactLoad(format!("malformed contract artifact: {}", e))
        })?;
        Self::from_abi(&artifact.abi)
    }

    /// Resolve `get()` and `set(uint)` in a parsed ABI.
    pub fn from_abi(abi: &JsonAbi) -> BlockchainResult<Self> {
        let getter = abi
            .function(GETTER)
            .and_then(|fs| fs.iter().find(|f| f.inputs.is_empty() && f.outputs.len() == 1))
            .cloned()
            .ok_or_else(|| {
                BlockchainError::ArtifactLoad(format!(
                    "ABI has no zero-argument '{}' function",
                    GETTER
                ))
            })?;

        let setter = abi
            .function(SETTER)
            .and_then(|fs| fs.iter().find(|f| f.inputs.len() == 1))
            .cloned()
            .ok_or_else(|| {
                BlockchainError::ArtifactLoad(format!(
                    "ABI has no single-argument '{}' function",
                    SETTER
                ))
            })?;

        Ok(Self { getter, setter })
    }

    /// Calldata for `get()`.
    pub fn encode_get(&self) -> BlockchainResult<Vec<u8>> {
        self.getter
            .abi_encode_input(&[])
            .map_err(|e| {
                BlockchainError::ChainRead(format!("cannot encode '{}' call: {}", GETTER, e))
            })
    }

    /// Decode the return data of `get()` into an unsigned integer.
    pub fn decode_get(&self, output: &[u8]) -> BlockchainResult<U256> {
        if output.is_empty() {
            return Err(BlockchainError::ChainRead(format!(
                "empty return from contract function '{}'",
                GETTER
            )));
        }

        let values = self.getter.abi_decode_output(output).map_err(|e| {
            BlockchainError::ChainRead(format!("cannot decode '{}' return data: {}", GETTER, e))
        })?;

        match values.first() {
            None => Err(BlockchainError::ChainRead(format!(
                "empty return from contract function '{}'",
                GETTER
            ))),
            Some(DynSolValue::Uint(value, _)) => Ok(*value),
            Some(DynSolValue::Int(value, _)) if !value.is_negative() => Ok(value.into_raw()),
            Some(other) => Err(BlockchainError::ChainRead(format!(
                "unexpected return type from '{}': {:?}",
                GETTER,
                other.as_type()
            ))),
        }
    }

    /// Calldata for `set(value)`.
    pub fn encode_set(&self, value: U256) -> BlockchainResult<Vec<u8>> {
        self.setter
            .abi_encode_input(&[DynSolValue::Uint(value, 256)])
            .map_err(|e| {
                BlockchainError::ChainWrite(format!(
                    "cannot encode '{}({})' call: {}",
                    SETTER, value, e
                ))
            })
    }
}

/// Resolve the contract address from a deployment map file.
pub fn load_contract_address(path: &Path, contract_name: &str) -> BlockchainResult<Address> {
    let raw = fs::read_to_string(path).map_err(|e| {
        BlockchainError::ArtifactLoad(format!(
            "cannot read deployment map {}: {}",
            path.display(),
            e
        ))
    })?;
    resolve_contract_address(&raw, contract_name)
}

/// Look up `contract_name` in a JSON deployment map.
pub fn resolve_contract_address(raw: &str, contract_name: &str) -> BlockchainResult<Address> {
    let deployments: BTreeMap<String, String> = serde_json::from_str(raw)
        .map_err(|e| BlockchainError::ArtifactLoad(format!("malformed deployment map: {}", e)))?;

    let address = deployments.get(contract_name).ok_or_else(|| {
        let known: Vec<&str> = deployments.keys().map(String::as_str).collect();
        BlockchainError::ArtifactLoad(format!(
            "contract '{}' not found in deployment map (entries: {:?})",
            contract_name, known
        ))
    })?;

    address.parse().map_err(|e| {
        BlockchainError::ArtifactLoad(format!(
            "invalid address '{}' for contract '{}': {}",
            address, contract_name, e
        ))
    })
}

//! Shared utilities for integration testing.
#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, TxHash, B256, U256};
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use contract_sync::blockchain::{BlockchainError, ContractClient, Signer};
use contract_sync::config::{ServerConfig, TimeoutConfig};
use contract_sync::storage::{StoreError, StoreResult, ValueStore, CONTRACT_VALUE_KEY};
use contract_sync::{ContractService, HttpServer, Shutdown};

/// Well-known development key (first Hardhat/Anvil account).
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const CONTRACT_NAME: &str = "SimpleStorageModule#SimpleStorage";
pub const CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const CHAIN_ID: u64 = 1337;

pub const SIMPLE_STORAGE_ARTIFACT: &str = r#"{
    "contractName": "SimpleStorage",
    "abi": [
        {
            "inputs": [],
            "name": "get",
            "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{ "internalType": "uint256", "name": "x", "type": "uint256" }],
            "name": "set",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ]
}"#;

pub fn test_signer() -> Signer {
    Signer::load(Some(TEST_PRIVATE_KEY)).unwrap()
}

/// Unique path under the system temp dir, removed on drop.
pub struct TempPath {
    pub path: PathBuf,
}

impl TempPath {
    pub fn new(tag: &str, ext: &str) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "contract_sync_it_{}_{}_{}.{}",
            tag,
            std::process::id(),
            n,
            ext
        ));
        std::fs::remove_file(&path).unwrap_or_default();
        Self { path }
    }

    pub fn with_contents(tag: &str, ext: &str, contents: &str) -> Self {
        let tmp = Self::new(tag, ext);
        std::fs::write(&tmp.path, contents).unwrap();
        tmp
    }

    pub fn as_str(&self) -> &str {
        self.path.to_str().unwrap()
    }

    /// SQLite URL creating the file on first connect.
    pub fn sqlite_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).unwrap_or_default();
    }
}

/// Artifact and deployment map files for the storage contract.
pub struct ArtifactFiles {
    pub abi: TempPath,
    pub addresses: TempPath,
}

impl ArtifactFiles {
    pub fn write() -> Self {
        let addresses = format!(r#"{{"{}": "{}"}}"#, CONTRACT_NAME, CONTRACT_ADDRESS);
        Self {
            abi: TempPath::with_contents("abi", "json", SIMPLE_STORAGE_ARTIFACT),
            addresses: TempPath::with_contents("addresses", "json", &addresses),
        }
    }
}

// ---------------------------------------------------------------------------
// Mock JSON-RPC node
// ---------------------------------------------------------------------------

/// In-memory node answering the handful of methods the client uses.
///
/// Raw transactions are decoded and their `set` argument applied at once,
/// as an instant-sealing development chain would.
#[derive(Default)]
pub struct MockNode {
    pub value: Mutex<U256>,
    pub nonce: AtomicU64,
    pub raw_transactions: Mutex<Vec<Vec<u8>>>,
    pub fail_calls: AtomicBool,
    pub reject_transactions: AtomicBool,
}

impl MockNode {
    pub fn with_value(value: u64) -> Arc<Self> {
        let node = Self::default();
        *node.value.lock().unwrap() = U256::from(value);
        Arc::new(node)
    }

    pub fn value(&self) -> U256 {
        *self.value.lock().unwrap()
    }

    /// Decoded envelopes of every accepted raw transaction.
    pub fn transactions(&self) -> Vec<TxEnvelope> {
        self.raw_transactions
            .lock()
            .unwrap()
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap())
            .collect()
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, (i64, String)> {
        match method {
            "eth_chainId" => Ok(json!(format!("0x{:x}", CHAIN_ID))),
            "eth_blockNumber" => Ok(json!("0x10")),
            "eth_gasPrice" => Ok(json!("0x3b9aca00")),
            "eth_getTransactionCount" => {
                Ok(json!(format!("0x{:x}", self.nonce.load(Ordering::SeqCst))))
            }
            "eth_call" => {
                if self.fail_calls.load(Ordering::SeqCst) {
                    return Err((-32000, "execution reverted".to_string()));
                }
                let word = self.value().to_be_bytes::<32>();
                Ok(json!(format!("0x{}", alloy::primitives::hex::encode(word))))
            }
            "eth_sendRawTransaction" => {
                if self.reject_transactions.load(Ordering::SeqCst) {
                    return Err((-32000, "nonce too low".to_string()));
                }
                let raw_hex = params[0].as_str().unwrap_or_default();
                let raw = alloy::primitives::hex::decode(raw_hex)
                    .map_err(|e| (-32602, format!("invalid raw transaction: {}", e)))?;
                let envelope = TxEnvelope::decode_2718(&mut raw.as_slice())
                    .map_err(|e| (-32602, format!("undecodable transaction: {}", e)))?;

                let input = envelope.input();
                if input.len() >= 36 {
                    *self.value.lock().unwrap() = U256::from_be_slice(&input[4..36]);
                }
                self.nonce.fetch_add(1, Ordering::SeqCst);

                let hash = keccak256(&raw);
                self.raw_transactions.lock().unwrap().push(raw);
                Ok(json!(hash.to_string()))
            }
            other => Err((-32601, format!("method {} not found", other))),
        }
    }
}

async fn rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();
    let body = match node.handle(method, &request["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    };
    Json(body)
}

/// Serve `node` on an ephemeral port; returns its URL.
pub async fn start_mock_node(node: Arc<MockNode>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", post(rpc)).with_state(node);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

// ---------------------------------------------------------------------------
// In-memory collaborators for API tests
// ---------------------------------------------------------------------------

/// Contract double with optional failure and latency.
#[derive(Default)]
pub struct FakeContract {
    pub value: Mutex<U256>,
    pub fail: AtomicBool,
    pub delay: Mutex<Option<Duration>>,
    pub writes: AtomicUsize,
}

impl FakeContract {
    pub fn with_value(value: u64) -> Arc<Self> {
        let contract = Self::default();
        *contract.value.lock().unwrap() = U256::from(value);
        Arc::new(contract)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ContractClient for FakeContract {
    async fn read_value(&self) -> Result<U256, BlockchainError> {
        self.pause().await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(BlockchainError::ChainRead("connection refused".to_string()));
        }
        Ok(*self.value.lock().unwrap())
    }

    async fn write_value(&self, value: U256, _signer: &Signer) -> Result<TxHash, BlockchainError> {
        self.pause().await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(BlockchainError::ChainWrite("nonce too low".to_string()));
        }
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().unwrap() = value;
        Ok(B256::with_last_byte(n as u8 + 1))
    }

    async fn is_healthy(&self) -> bool {
        !self.fail.load(Ordering::SeqCst)
    }
}

/// Store double counting writes.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<HashMap<String, U256>>,
    pub saves: AtomicUsize,
}

impl FakeStore {
    pub fn with_value(value: u64) -> Arc<Self> {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap()
            .insert(CONTRACT_VALUE_KEY.to_string(), U256::from(value));
        Arc::new(store)
    }

    pub fn stored(&self) -> Option<U256> {
        self.rows.lock().unwrap().get(CONTRACT_VALUE_KEY).copied()
    }
}

#[async_trait]
impl ValueStore for FakeStore {
    async fn get(&self, key: &str) -> StoreResult<U256> {
        Ok(self.rows.lock().unwrap().get(key).copied().unwrap_or(U256::ZERO))
    }

    async fn save(&self, key: &str, value: U256) -> StoreResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

/// Store double whose every call fails.
pub struct BrokenStore;

#[async_trait]
impl ValueStore for BrokenStore {
    async fn get(&self, key: &str) -> StoreResult<U256> {
        Err(StoreError::Corrupt {
            key: key.to_string(),
            raw: "not-a-number".to_string(),
        })
    }

    async fn save(&self, key: &str, _value: U256) -> StoreResult<()> {
        Err(StoreError::Corrupt {
            key: key.to_string(),
            raw: String::new(),
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(StoreError::Corrupt {
            key: "health".to_string(),
            raw: String::new(),
        })
    }

    async fn close(&self) {}
}

// ---------------------------------------------------------------------------
// Server harness
// ---------------------------------------------------------------------------

/// A running API server bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub async fn start(
        contract: Arc<dyn ContractClient>,
        store: Arc<dyn ValueStore>,
        timeouts: TimeoutConfig,
    ) -> Self {
        let service = Arc::new(ContractService::new(contract, store, test_signer()));
        Self::start_service(service, timeouts).await
    }

    pub async fn start_service(service: Arc<ContractService>, timeouts: TimeoutConfig) -> Self {
        let server = HttpServer::new(service, &ServerConfig::default(), timeouts);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(server.run(listener, shutdown.notified()));

        Self {
            base_url: format!("http://{}", addr),
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

pub fn parse_address(raw: &str) -> Address {
    raw.parse().unwrap()
}

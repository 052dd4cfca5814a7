//! Contract value sync service library.
//!
//! Reads and writes the integer held by a `SimpleStorage` contract and keeps
//! a relational copy of it reconciled with the chain.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod storage;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::ContractService;

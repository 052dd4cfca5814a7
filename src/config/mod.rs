//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, never overrides the process environment)
//!     → process environment
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BESU_NODE_URL, DATABASE_URL, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The signer's private key is never part of the config; it is read from
//!   the environment by the wallet

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_dotenv, ConfigError, DOTENV_FILE};
pub use schema::{
    AppConfig, BlockchainConfig, ContractConfig, DatabaseConfig, ObservabilityConfig,
    ServerConfig, TimeoutConfig,
};

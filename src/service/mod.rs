//! Reconciliation between the chain, the signer and the persisted record.
//!
//! # Data Flow
//! ```text
//! http handlers
//!     → reconcile.rs (get / set / sync / check)
//!     → ContractClient (network value, transactions)
//!     → ValueStore (persisted value)
//!     → Signer (transactor address)
//! ```
//!
//! # Design Decisions
//! - The chain is authoritative; the store is only ever corrected toward it
//! - No state survives between calls
//! - Errors carry the operation and key/value involved; nothing is retried

pub mod reconcile;

pub use reconcile::{CheckOutcome, ContractService, ServiceError, SyncOutcome};

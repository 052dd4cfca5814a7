//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! service (sync/check)
//!     → store.rs (ValueStore capability: get / save / validate)
//!     → sql.rs (sqlx AnyPool, upsert into contract_values)
//! ```
//!
//! # Design Decisions
//! - The store is a cache of the chain; it is only ever corrected toward the
//!   network value
//! - Absence of a row reads as zero
//! - Writes are single-statement upserts; the database resolves concurrent
//!   writers, the last committed write wins

pub mod sql;
pub mod store;

pub use sql::SqlValueStore;
pub use store::{StoreError, StoreResult, ValueStore, CONTRACT_VALUE_KEY};

//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler:
//!     → timeouts.rs (enforce per-operation deadline)
//!     → service call (chain RPC, SQL)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every request has a deadline
//! - No retries: every failure is reported once to the caller

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};

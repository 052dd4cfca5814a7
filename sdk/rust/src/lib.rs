//! Typed client for the contract-sync HTTP API.

pub mod client;

pub use client::{
    ApiClient, CheckResult, ClientError, CurrentValue, SubmittedTransaction, SyncResult,
};

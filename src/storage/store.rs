//! Value store capability and error types.

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

/// Logical key of the single tracked contract value.
pub const CONTRACT_VALUE_KEY: &str = "simple_storage_current_value";

/// Errors raised by the value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Pool could not be created or the schema could not be applied.
    #[error("database connection error: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement failed.
    #[error("database {operation} failed for key '{key}': {source}")]
    Query {
        operation: &'static str,
        key: String,
        #[source]
        source: sqlx::Error,
    },

    /// The stored string is not a non-negative decimal integer.
    #[error("stored value '{raw}' for key '{key}' is not a decimal integer")]
    Corrupt { key: String, raw: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted last-known value per logical key.
#[async_trait]
pub trait ValueStore: Send + Sync {
    /// Stored value for `key`, or zero when no record exists.
    async fn get(&self, key: &str) -> StoreResult<U256>;

    /// Insert or overwrite the value for `key` and refresh its timestamp.
    async fn save(&self, key: &str, value: U256) -> StoreResult<()>;

    /// Whether the stored value equals `expected`. Absent and zero are equal.
    async fn validate(&self, key: &str, expected: U256) -> StoreResult<bool> {
        Ok(self.get(key).await? == expected)
    }

    /// Cheap connectivity probe.
    async fn health_check(&self) -> StoreResult<()>;

    /// Release pooled connections.
    async fn close(&self);
}

/// Parse the decimal encoding used in the `contract_value` column.
pub(crate) fn decode_value(key: &str, raw: &str) -> StoreResult<U256> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::Corrupt {
            key: key.to_string(),
            raw: raw.to_string(),
        });
    }
    U256::from_str_radix(raw, 10).map_err(|_| StoreError::Corrupt {
        key: key.to_string(),
        raw: raw.to_string(),
    })
}

//! SQL-backed value store.

use alloy::primitives::U256;
use async_trait::async_trait;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::storage::store::{decode_value, StoreError, StoreResult, ValueStore};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS contract_values (
    contract_key TEXT PRIMARY KEY,
    contract_value TEXT NOT NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_SQL: &str =
    "SELECT contract_value FROM contract_values WHERE contract_key = $1 LIMIT 1";

const UPSERT_SQL: &str = "INSERT INTO contract_values (contract_key, contract_value)
VALUES ($1, $2)
ON CONFLICT (contract_key) DO UPDATE
SET contract_value = EXCLUDED.contract_value,
    updated_at = CURRENT_TIMESTAMP";

/// Value store over an sqlx `AnyPool` (PostgreSQL or SQLite).
#[derive(Debug, Clone)]
pub struct SqlValueStore {
    pool: AnyPool,
}

impl SqlValueStore {
    /// Open the pool, verify connectivity and apply the schema.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connection established"
        );
        Ok(store)
    }

    /// Create the `contract_values` table when missing.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Connect)?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl ValueStore for SqlValueStore {
    async fn get(&self, key: &str) -> StoreResult<U256> {
        let raw: Option<String> = sqlx::query_scalar(SELECT_SQL)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                operation: "select",
                key: key.to_string(),
                source,
            })?;

        match raw {
            Some(raw) => decode_value(key, &raw),
            None => Ok(U256::ZERO),
        }
    }

    async fn save(&self, key: &str, value: U256) -> StoreResult<()> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value.to_string())
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                operation: "upsert",
                key: key.to_string(),
                source,
            })?;

        tracing::debug!(key = key, value = %value, "Stored contract value");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Query {
                operation: "health check",
                key: String::new(),
                source,
            })?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

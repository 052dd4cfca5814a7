//! Endpoint handlers.
//!
//! Each handler runs its service call under the configured deadline and
//! records the outcome.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::time::Instant;

use crate::http::request::SetValueRequest;
use crate::http::response::{
    ApiError, CheckResponse, CurrentValueResponse, HealthResponse, SetValueResponse, SyncResponse,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::with_deadline;

fn record<T>(operation: &'static str, start: Instant, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::record_operation(operation, outcome, start);
}

/// `GET /value`
pub async fn get_value(
    State(state): State<AppState>,
) -> Result<Json<CurrentValueResponse>, ApiError> {
    let start = Instant::now();
    let result: Result<_, ApiError> = async {
        let (value, address) = with_deadline(
            "get value",
            state.timeouts.read(),
            state.service.get_current_value(),
        )
        .await??;

        Ok(Json(CurrentValueResponse {
            current_value: value.to_string(),
            transactor_address: address.to_string(),
        }))
    }
    .await;

    record("get_value", start, &result);
    result
}

/// `POST /value`
pub async fn set_value(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let result: Result<_, ApiError> = async {
        let value = SetValueRequest::from_json(&body)?.target()?;

        let tx_hash = with_deadline(
            "set value",
            state.timeouts.write(),
            state.service.set_new_value(value),
        )
        .await??;

        Ok((
            StatusCode::ACCEPTED,
            Json(SetValueResponse {
                message: "Transaction submitted".to_string(),
                tx_hash: tx_hash.to_string(),
                new_value: value.to_string(),
            }),
        ))
    }
    .await;

    record("set_value", start, &result);
    result
}

/// `POST /sync`
pub async fn sync_value(State(state): State<AppState>) -> Result<Json<SyncResponse>, ApiError> {
    let start = Instant::now();
    let result: Result<_, ApiError> = async {
        let outcome = with_deadline(
            "sync",
            state.timeouts.sync(),
            state.service.sync_contract_value(),
        )
        .await??;

        let message = if outcome.updated {
            "Database updated to network value"
        } else {
            "Database already matches network value"
        };

        Ok(Json(SyncResponse {
            message: message.to_string(),
            network_value: outcome.network_value.to_string(),
            database_value: outcome.database_value.to_string(),
        }))
    }
    .await;

    record("sync", start, &result);
    result
}

/// `GET /check`
pub async fn check_value(State(state): State<AppState>) -> Result<Json<CheckResponse>, ApiError> {
    let start = Instant::now();
    let result: Result<_, ApiError> = async {
        let outcome = with_deadline(
            "check",
            state.timeouts.check(),
            state.service.check_contract_value(),
        )
        .await??;

        Ok(Json(CheckResponse {
            matches: outcome.matches,
            network_value: outcome.network_value.to_string(),
            database_value: outcome.database_value.to_string(),
            message: "Values compared".to_string(),
        }))
    }
    .await;

    record("check", start, &result);
    result
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (chain, database) = with_deadline(
        "health",
        state.timeouts.read(),
        state.service.health(),
    )
    .await
    .unwrap_or((false, false));

    let healthy = chain && database;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            chain,
            database,
        }),
    )
}

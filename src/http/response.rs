//! Response bodies and error mapping.
//!
//! # Design Decisions
//! - Integers are rendered as decimal strings (uint256 does not fit JSON numbers)
//! - Validation failures map to 400, deadline expiry to 504, everything else to 500
//! - The wrapped error message is returned to the caller unredacted

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::resilience::DeadlineExceeded;
use crate::service::ServiceError;

/// `GET /value` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentValueResponse {
    pub current_value: String,
    pub transactor_address: String,
}

/// `POST /value` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetValueResponse {
    pub message: String,
    pub tx_hash: String,
    pub new_value: String,
}

/// `POST /sync` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    pub network_value: String,
    pub database_value: String,
}

/// `GET /check` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(rename = "match")]
    pub matches: bool,
    pub network_value: String,
    pub database_value: String,
    pub message: String,
}

/// `GET /health` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub chain: bool,
    pub database: bool,
}

/// Error body shared by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    Validation(String),
    /// Service call failed.
    Service(ServiceError),
    /// Per-request deadline elapsed.
    Timeout(DeadlineExceeded),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "invalid",
            ApiError::Service(_) => "error",
            ApiError::Timeout(_) => "timeout",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "invalid request: {}", msg),
            ApiError::Service(e) => write!(f, "{}", e),
            ApiError::Timeout(e) => write!(f, "{}", e),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError::Service(e)
    }
}

impl From<DeadlineExceeded> for ApiError {
    fn from(e: DeadlineExceeded) -> Self {
        ApiError::Timeout(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

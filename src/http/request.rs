//! Request identification and body parsing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the caller supplied one
//! - Parse and validate the `POST /value` body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Negative values are rejected here, before the service is reached

use alloy::primitives::U256;
use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use serde_json::value::RawValue;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header name for [`X_REQUEST_ID`].
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// `POST /value` body.
///
/// `value` is kept as raw JSON text so integers beyond `u64` survive
/// parsing; [`SetValueRequest::target`] checks it against the `uint256` range.
#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub value: Box<RawValue>,
}

impl SetValueRequest {
    /// Parse a request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::Validation(e.to_string()))
    }

    /// Validated target value.
    pub fn target(&self) -> Result<U256, ApiError> {
        let raw = self.value.get().trim();

        if is_digits(raw) {
            return U256::from_str_radix(raw, 10).map_err(|_| {
                ApiError::Validation(format!("value {} exceeds the uint256 range", raw))
            });
        }
        if raw.strip_prefix('-').is_some_and(is_digits) {
            return Err(ApiError::Validation("value must not be negative".to_string()));
        }
        Err(ApiError::Validation(format!(
            "value must be a non-negative integer, got {}",
            raw
        )))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

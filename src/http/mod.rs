//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body validation)
//!     → handlers.rs (deadline, service call)
//!     → response.rs (JSON bodies, error → status mapping)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{SetValueRequest, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};

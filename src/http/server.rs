//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic recovery, body limit)
//! - Bind server to listener and serve until shutdown

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ServerConfig, TimeoutConfig};
use crate::http::handlers;
use crate::http::request::{request_id_header, UuidRequestId, X_REQUEST_ID};
use crate::service::ContractService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContractService>,
    pub timeouts: TimeoutConfig,
}

/// HTTP server for the contract API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around the service.
    pub fn new(
        service: Arc<ContractService>,
        server: &ServerConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        let state = AppState { service, timeouts };
        Self {
            router: Self::build_router(server, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(server: &ServerConfig, state: AppState) -> Router {
        let request_id = request_id_header();

        Router::new()
            .route("/value", get(handlers::get_value).post(handlers::set_value))
            .route("/sync", post(handlers::sync_value))
            .route("/check", get(handlers::check_value))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(DefaultBodyLimit::max(server.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(CatchPanicLayer::new()),
            )
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

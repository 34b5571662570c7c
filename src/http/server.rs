//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all handler
//! - Wire up middleware (tracing)
//! - Dispatch on method: OPTIONS → preflight, GET/HEAD/POST → forward,
//!   anything else → 405
//! - Serve with graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::cors::{preflight, OriginAllowList};
use crate::http::error::RelayError;
use crate::http::forward;

/// Application state injected into handlers.
///
/// The allow-list is read-only after construction; the client is shared so
/// all invocations use one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub allow_list: Arc<OriginAllowList>,
    pub client: reqwest::Client,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let allow_list = Arc::new(OriginAllowList::new(config.cors.allowed_origins.clone()));
        let client = reqwest::Client::new();

        let state = AppState { allow_list, client };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router. Every path goes through the same dispatcher;
    /// the target is chosen by the `url` query parameter, not the path.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Request dispatcher: one inbound request, exactly one outbound response.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();

    if method == Method::OPTIONS {
        // Preflight is answered locally, no upstream call.
        return preflight::respond(request.headers(), &state.allow_list);
    }

    if method == Method::GET || method == Method::HEAD || method == Method::POST {
        return match forward::forward(&state, request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(method = %method, error = %error, "Relay error");
                error.into_response()
            }
        };
    }

    tracing::debug!(method = %method, "Unsupported method");
    RelayError::UnsupportedMethod.into_response()
}

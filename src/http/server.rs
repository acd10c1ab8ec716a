//! Web configuration server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the axum Router with all handlers and middleware
//! - Dispatch by path: bundled assets, API, or 404
//! - Serve on a caller-supplied listener until the stop signal
//! - Release the socket on shutdown, idempotent stop
//!
//! # Design Decisions
//! - Binding stays with the caller so a port-in-use failure surfaces there,
//!   with no silent retry
//! - Path dispatch mirrors the UI contract: extension rules rank above the
//!   /api/ prefix, unknown non-API paths get a plain-text 404

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::error::Error;
use crate::http::{api, assets, request};
use crate::lifecycle::Shutdown;
use crate::store::book::Book;
use crate::workers::supervisor::Supervisor;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<Book>,
    pub supervisor: Arc<Supervisor>,
    pub max_body_bytes: usize,
}

/// Build the axum router with all middleware layers.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/config", get(api::get_config).post(api::save_config))
        .route("/api/info", get(api::get_info))
        .route("/api/test", get(api::test_connection))
        .fallback(dispatch_fallback)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request::request_id))
        .layer(TraceLayer::new_for_http())
}

/// Everything not matched by an exact API route: bundled assets by
/// extension, unknown API paths, then the plain-text 404.
async fn dispatch_fallback(uri: Uri) -> Response {
    let path = uri.path();

    if path == "/" || path == "/index.html" {
        return assets::serve("index.html", "text/html");
    }
    if path.ends_with(".css") {
        return assets::serve(path.trim_start_matches('/'), "text/css");
    }
    if path.ends_with(".js") {
        return assets::serve(path.trim_start_matches('/'), "application/javascript");
    }
    if path.starts_with("/api/") {
        return Error::ApiNotFound.into_response();
    }

    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "404 Not Found",
    )
        .into_response()
}

/// The embedded web configuration server.
pub struct ConfigServer {
    state: AppState,
    request_timeout: Duration,
    shutdown: Shutdown,
}

/// Cloneable stop handle for a `ConfigServer`. Stopping twice, or before the
/// server starts serving, is harmless.
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Shutdown,
}

impl ServerHandle {
    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl ConfigServer {
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        Self {
            state,
            request_timeout,
            shutdown: Shutdown::new(),
        }
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// The shutdown signal this server serves under, for wiring host-level
    /// stop sources (OS signals) to the same stop path.
    pub fn shutdown_signal(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serve on the given listener until the stop signal, then release it.
    pub async fn serve(self, listener: TcpListener) -> crate::Result<()> {
        let addr = listener.local_addr()?;
        info!(address = %addr, "web configuration server listening");

        let app = build_router(self.state, self.request_timeout);
        let mut stop_rx = self.shutdown.subscribe();
        let shutdown = self.shutdown.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // A stop requested before this future was polled is already
                // recorded; only wait when it has not fired yet.
                if !shutdown.is_triggered() {
                    let _ = stop_rx.recv().await;
                }
            })
            .await?;

        info!("web configuration server stopped");
        Ok(())
    }
}

//! HTTP gateway mounting the memory, filesystem and GitHub tool servers.
//!
//! Routing is static prefix dispatch plus a health check. Every failure a
//! mounted handler reports, including a panic, becomes
//! `500 {"error": <message>}`.

pub mod handler;
pub mod proxy;

#[cfg(test)]
mod tests;

use std::any::Any;
use std::io;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::FutureExt;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::core::config::GatewaySettings;

pub use handler::{HandlerError, Handlers, McpHandler, Mount, UnconfiguredHandler};
pub use proxy::ProxyHandler;

pub const ALLOWED_PATHS_HEADER: &str = "x-mcp-allowed-paths";

#[derive(Clone)]
struct MountState {
    mount: Mount,
    handler: Arc<dyn McpHandler>,
}

/// A handler failure on its way to becoming a 500 response.
#[derive(Debug)]
pub struct GatewayError {
    mount: Mount,
    source: HandlerError,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!(mount = %self.mount, error = %self.source, "handler failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.source.message() })),
        )
            .into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn dispatch(
    State(state): State<MountState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let outcome = AssertUnwindSafe(state.handler.handle(request))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(HandlerError::new(panic_message(panic.as_ref()))));
    outcome.map_err(|source| GatewayError {
        mount: state.mount,
        source,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

pub fn build_router(handlers: &Handlers) -> Router {
    Mount::ALL
        .into_iter()
        .fold(Router::new().route("/health", get(health)), |router, mount| {
            let state = MountState {
                mount,
                handler: handlers.get(mount),
            };
            router.nest_service(mount.prefix(), dispatch.with_state(state))
        })
}

/// Builds the handlers the binary mounts: a [`ProxyHandler`] for every mount
/// with an upstream, an [`UnconfiguredHandler`] otherwise.
pub fn handlers_from_settings(settings: &GatewaySettings, client: &reqwest::Client) -> Handlers {
    let proxy_or_unconfigured = |mount: Mount, upstream: &Option<String>| -> Arc<dyn McpHandler> {
        match upstream {
            Some(url) => Arc::new(mount_headers(
                ProxyHandler::new(mount, client.clone(), url.clone()),
                settings,
            )),
            None => {
                warn!(%mount, "no upstream configured, requests will fail");
                Arc::new(UnconfiguredHandler::new(mount))
            }
        }
    };

    Handlers {
        memory: proxy_or_unconfigured(Mount::Memory, &settings.memory_upstream),
        filesystem: proxy_or_unconfigured(Mount::Filesystem, &settings.filesystem_upstream),
        github: proxy_or_unconfigured(Mount::Github, &settings.github_upstream),
    }
}

fn mount_headers(proxy: ProxyHandler, settings: &GatewaySettings) -> ProxyHandler {
    let (name, value) = match proxy.mount() {
        Mount::Github => match &settings.github_token {
            Some(token) => (header::AUTHORIZATION, format!("Bearer {token}")),
            None => return proxy,
        },
        Mount::Filesystem => {
            let joined = settings
                .allowed_paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(":");
            (HeaderName::from_static(ALLOWED_PATHS_HEADER), joined)
        }
        Mount::Memory => return proxy,
    };

    match HeaderValue::from_str(&value) {
        Ok(value) => proxy.with_header(name, value),
        Err(err) => {
            warn!(header = %name, error = %err, "skipping header with invalid characters");
            proxy
        }
    }
}

/// Binds `0.0.0.0:<port>` and serves until `shutdown` is cancelled.
pub async fn serve(
    settings: &GatewaySettings,
    handlers: Handlers,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, handlers, shutdown).await
}

pub async fn serve_listener(
    listener: TcpListener,
    handlers: Handlers,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let port = listener.local_addr()?.port();
    let router = build_router(&handlers);

    info!("MCP gateway listening on port {port}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    info!("MCP gateway stopped");
    Ok(())
}

//! Local static file server for previewing the SvS history page.
//!
//! Only whitelisted extensions are served; directories fall back to their
//! `index.html` or `index.htm`. Everything else is a 404.

pub mod files;

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};

pub const DEFAULT_PORT: u16 = 7500;

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Directory served as `/`.
    pub root: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
        }
    }
}

impl ServeConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

type SiteRoot = Arc<PathBuf>;

pub fn router(root: PathBuf) -> Router {
    Router::new()
        .route("/", get(serve_root))
        .route("/{*path}", get(serve_path))
        .with_state(Arc::new(root))
        .layer(middleware::from_fn(log_request))
}

/// Binds the listener and serves until the process is stopped.
pub async fn serve(config: ServeConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(
        "Serving {} on http://{}",
        config.root.display(),
        listener.local_addr()?
    );
    axum::serve(listener, router(config.root)).await
}

async fn serve_root(State(root): State<SiteRoot>) -> Response {
    send_file(&root.join("index.html")).await
}

async fn serve_path(State(root): State<SiteRoot>, Path(path): Path<String>) -> Response {
    match files::resolve(&root, &path).await {
        Some(file) => send_file(&file).await,
        None => not_found(),
    }
}

async fn send_file(path: &std::path::Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, files::content_type(path))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!("cannot read {}: {e}", path.display());
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!("{method} {uri} {}", response.status().as_u16());
    response
}

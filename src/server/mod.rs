//! HTTP relay server.
//!
//! This module provides:
//! - The axum router for the extension-facing endpoints (`routes`)
//! - Configuration and secrets loading (`config`)
//!
//! The relay binds to loopback by default; callers are not authenticated.

pub mod config;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::Analyzer;

pub use routes::router;

/// Serve the relay on `listener` until the process exits.
pub async fn serve(listener: TcpListener, analyzer: Arc<Analyzer>) -> std::io::Result<()> {
    axum::serve(listener, router(analyzer)).await
}

/// Serve the relay on `listener` until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    analyzer: Arc<Analyzer>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(shutdown)
        .await
}

// HTTP adapter
// Binds an EventHost to a TCP listener

mod handlers;

pub use handlers::{create_app, event_from_request};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::host::EventHost;

/// Serve `host` until the process is stopped
pub async fn serve(host: Arc<EventHost>, config: &ServerConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;

    let app = create_app(host).layer(TraceLayer::new_for_http());

    tracing::info!("Starting model router on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

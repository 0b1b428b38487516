use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::http::handler::Handler;

/// Binds the configured address.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Binds and serves until accepting fails.
pub async fn run(cfg: &ServerConfig, handler: Option<Arc<dyn Handler>>) -> anyhow::Result<()> {
    let listener = bind(cfg).await?;
    serve(listener, cfg, handler).await
}

/// Accepts connections forever.
///
/// Connections are served one at a time unless `cfg.concurrent` is set. A
/// failed exchange is logged and the loop moves on; a failed accept ends it,
/// as does an invalid `cfg`, before anything is accepted.
pub async fn serve(
    listener: TcpListener,
    cfg: &ServerConfig,
    handler: Option<Arc<dyn Handler>>,
) -> anyhow::Result<()> {
    cfg.validate()?;
    let read_timeout = cfg.read_timeout();

    loop {
        let (socket, peer) = listener.accept().await.context("accept failed")?;
        info!(%peer, "Accepted connection");

        let mut conn = Connection::new(socket, handler.clone(), cfg.buffer_size, read_timeout)?;

        if cfg.concurrent {
            tokio::spawn(async move {
                if let Err(e) = conn.run().await {
                    error!(%peer, error = %format!("{:#}", e), "Connection error");
                }
            });
        } else if let Err(e) = conn.run().await {
            error!(%peer, error = %format!("{:#}", e), "Connection error");
        }
    }
}

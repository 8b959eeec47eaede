//! HTTP server bootstrap.

use crate::routes::create_router;
use crate::state::ApiState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Bind and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "API listening");

    axum::serve(listener, create_router(state)).await
}

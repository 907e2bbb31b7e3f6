use std::net::SocketAddr;

use alicuota_core::AlicuotaService;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::routes::build_router;

/// Serves the API on `addr` until Ctrl+C.
pub async fn serve(
    addr: SocketAddr,
    service: AlicuotaService,
) -> ServerResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, rows = service.dataset().len(), "listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C. Never resolves when the handler cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(error) => {
            warn!(%error, "cannot listen for Ctrl+C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn shutdown_signal_stays_pending_without_ctrl_c() {
        let waited = tokio::time::timeout(Duration::from_millis(50), shutdown_signal()).await;

        assert!(waited.is_err());
    }
}

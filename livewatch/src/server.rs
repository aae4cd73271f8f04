//! Server lifecycle management
//!
//! Starts the pollers and the HTTP server, then waits for a shutdown signal.

use std::time::Duration;

use livewatch_api::{create_router, AppState};
use livewatch_core::{bootstrap::Services, Config};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Upper bound on waiting for each component to stop
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LivewatchServer {
    config: Config,
    services: Services,
}

impl LivewatchServer {
    pub const fn new(config: Config, services: Services) -> Self {
        Self { config, services }
    }

    /// Start all components and wait for shutdown
    pub async fn start(self) -> anyhow::Result<()> {
        let http_address = self.config.http_address();
        let listener = TcpListener::bind(&http_address)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind HTTP address {http_address}: {e}"))?;
        info!("HTTP server listening on {}", http_address);

        let cancel = CancellationToken::new();

        let pollers = self.services.pollers().start(cancel.child_token());
        let mut http_handle = self.start_http_server(listener, cancel.clone());

        let http_stopped = tokio::select! {
            _ = &mut http_handle => {
                error!("HTTP server stopped unexpectedly");
                true
            }
            () = shutdown_signal() => {
                info!("Shutdown signal received, starting graceful shutdown...");
                false
            }
        };

        cancel.cancel();

        if tokio::time::timeout(SHUTDOWN_TIMEOUT, pollers).await.is_err() {
            warn!("Pollers did not stop within {}s", SHUTDOWN_TIMEOUT.as_secs());
        }
        if !http_stopped && tokio::time::timeout(SHUTDOWN_TIMEOUT, http_handle).await.is_err() {
            warn!("HTTP server did not stop within {}s", SHUTDOWN_TIMEOUT.as_secs());
        }

        info!("livewatch shut down complete");
        Ok(())
    }

    fn start_http_server(&self, listener: TcpListener, cancel: CancellationToken) -> JoinHandle<()> {
        let router = create_router(AppState::new(
            self.services.state.clone(),
            self.services.hub.clone(),
            cancel.clone(),
        ));

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(cancel.cancelled_owned())
                .await
            {
                error!("HTTP server error: {}", e);
            }

            info!("HTTP server shut down gracefully");
        })
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}

//! Server setup and lifecycle management

use tokio::net::TcpListener;

use crate::api::{create_router, AppState};
use crate::config::ServiceConfig;
use crate::error::ServiceResult;

pub struct Server {
    state: AppState,
}

impl Server {
    /// Fails when `ServiceConfig::validate` does.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            state: AppState::new(config),
        })
    }

    /// Binds the configured address and serves until Ctrl+C / SIGTERM.
    pub async fn run(self) -> ServiceResult<()> {
        let addr = self.state.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("telemetry simulator listening on {}", listener.local_addr()?);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already-bound listener until `shutdown` resolves.
    ///
    /// Open streams are cancelled before the server waits for connections
    /// to drain.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServiceResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let stop = self.state.shutdown.clone();
        let app = create_router(self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                stop.trigger();
            })
            .await?;

        tracing::info!("telemetry simulator shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received terminate signal, shutting down"),
    }
}

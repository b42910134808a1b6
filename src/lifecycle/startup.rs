//! Startup orchestration.
//!
//! Subsystems come up in order: tracing pipeline, metrics endpoint, router,
//! listener. The tracer provider is flushed after the server stops.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{RelayConfig, Role};
use crate::http::server::{RelayServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, Telemetry, TelemetryError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("metrics endpoint: {0}")]
    Metrics(String),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run `role` until `shutdown` fires.
pub async fn launch(role: Role, config: RelayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let telemetry = Arc::new(Telemetry::new(
        &config.observability,
        &config.service_name(role),
    )?);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e: std::net::AddrParseError| StartupError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let server = RelayServer::new(role, &config, telemetry.clone())?;

    let address = config.bind_address(role).to_string();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let result = server.run(listener, shutdown.subscribe()).await;
    telemetry.shutdown();
    result.map_err(StartupError::from)
}

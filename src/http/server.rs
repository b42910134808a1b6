//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the selected role
//! - Build the outbound HTTP clients
//! - Wire up middleware (request ID, request logs, panic recovery, timeout,
//!   body limit)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{Method, Request},
    routing::{get, post},
    BoxError, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{RelayConfig, Role, TimeoutConfig};
use crate::http::edge::{edge_handler, EdgeSettings, EdgeState};
use crate::http::health::health_route;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::resolver::{resolve_get, resolve_post, ResolverState};
use crate::http::response::{middleware_error_response, panic_response};
use crate::lifecycle::ShutdownSignal;
use crate::observability::Telemetry;
use crate::upstream::{GeocodingClient, UrlTemplate, WeatherClient};

/// Errors raised while assembling a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid forwarding method '{0}'")]
    InvalidMethod(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// HTTP server for one relay role.
pub struct RelayServer {
    router: Router,
    role: Role,
}

impl RelayServer {
    /// Build the server for `role`.
    pub fn new(
        role: Role,
        config: &RelayConfig,
        telemetry: Arc<Telemetry>,
    ) -> Result<Self, ServerError> {
        match role {
            Role::Edge => Self::edge(config, telemetry),
            Role::Resolver => Self::resolver(config, telemetry),
        }
    }

    /// Edge service: `POST /`, `POST /cep`, `GET /health`.
    pub fn edge(config: &RelayConfig, telemetry: Arc<Telemetry>) -> Result<Self, ServerError> {
        let edge = &config.edge;
        let method = Method::from_bytes(edge.method.as_bytes())
            .map_err(|_| ServerError::InvalidMethod(edge.method.clone()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = EdgeState {
            settings: Arc::new(EdgeSettings {
                method,
                url: UrlTemplate::new(edge.url.as_str()),
                span_name: edge.span_name.clone(),
                max_response_bytes: edge.max_response_bytes,
            }),
            client,
            telemetry,
        };

        let router = Router::new()
            .route("/", post(edge_handler))
            .route("/cep", post(edge_handler))
            .route("/health", health_route(Role::Edge))
            .layer(DefaultBodyLimit::max(edge.max_body_bytes))
            .with_state(state);

        Ok(Self {
            router: with_middleware(router, &config.timeouts),
            role: Role::Edge,
        })
    }

    /// Resolver service: `POST /`, `GET /weather?cep=`, `GET /health`.
    pub fn resolver(config: &RelayConfig, telemetry: Arc<Telemetry>) -> Result<Self, ServerError> {
        let resolver = &config.resolver;
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if !resolver.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        let state = ResolverState {
            geocoding: GeocodingClient::new(
                client.clone(),
                UrlTemplate::new(resolver.geocoding_url.as_str()),
                telemetry.clone(),
            ),
            weather: WeatherClient::new(
                client,
                UrlTemplate::new(resolver.weather_url.as_str()),
                resolver.weather_api_key.as_str(),
                telemetry.clone(),
            ),
            telemetry,
            span_name: Arc::from(resolver.span_name.as_str()),
        };

        let router = Router::new()
            .route("/", post(resolve_post))
            .route("/weather", get(resolve_get))
            .route("/health", health_route(Role::Resolver))
            .layer(DefaultBodyLimit::max(resolver.max_body_bytes))
            .with_state(state);

        Ok(Self {
            router: with_middleware(router, &config.timeouts),
            role: Role::Resolver,
        })
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            role = %self.role,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(role = %self.role, "HTTP server stopped");
        Ok(())
    }
}

/// Hosting middleware shared by both roles. The timeout drops the handler
/// future, which aborts any outbound call still in flight, and answers 408
/// with the usual JSON error body.
fn with_middleware(router: Router, timeouts: &TimeoutConfig) -> Router {
    let deadline = Duration::from_secs(timeouts.request_secs);
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |error: BoxError| {
                    middleware_error_response(deadline, error)
                }))
                .timeout(deadline),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

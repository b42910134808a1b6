//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract trace context from incoming request headers
//! - Open one span per handler under that context
//! - Inject the active context into every outbound request
//!
//! # Design Decisions
//! - `Telemetry` is built once at startup and handed to handler state; no
//!   global tracer provider or propagator is installed
//! - W3C Trace Context plus W3C Baggage headers
//! - Export over OTLP/HTTP is optional; without it spans are still recorded
//!   so their context propagates across hops

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{
    Extractor, Injector, TextMapCompositePropagator, TextMapPropagator,
};
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::ObservabilityConfig;

/// Instrumentation scope for every span this crate opens.
const SCOPE: &str = "cep-relay";

/// Errors raised while building the tracing pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),
}

/// Tracer provider and propagator shared by a service's handlers.
pub struct Telemetry {
    provider: SdkTracerProvider,
    propagator: TextMapCompositePropagator,
}

impl Telemetry {
    /// Build the pipeline described by `config`.
    pub fn new(config: &ObservabilityConfig, service_name: &str) -> Result<Self, TelemetryError> {
        let resource = Resource::builder()
            .with_service_name(service_name.to_string())
            .build();
        let mut builder = SdkTracerProvider::builder().with_resource(resource);

        let endpoint = config.otlp_endpoint.trim();
        if !endpoint.is_empty() {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
            builder = builder.with_batch_exporter(exporter);
            tracing::info!(endpoint = %endpoint, service = %service_name, "Span export enabled");
        } else {
            tracing::info!(service = %service_name, "Span export disabled, propagating context only");
        }

        Ok(Self {
            provider: builder.build(),
            propagator: default_propagator(),
        })
    }

    /// Pipeline without an exporter.
    pub fn without_export(service_name: &str) -> Self {
        let resource = Resource::builder()
            .with_service_name(service_name.to_string())
            .build();
        Self {
            provider: SdkTracerProvider::builder().with_resource(resource).build(),
            propagator: default_propagator(),
        }
    }

    /// Read the caller's trace context from inbound headers.
    ///
    /// Absent or malformed headers yield an empty context, so the handler
    /// span becomes a new root.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator.extract(&HeaderExtractor(headers))
    }

    /// Open a server span named `name` under `parent`.
    ///
    /// The span ends when the returned context (and every clone of it) is
    /// dropped.
    pub fn start_span(&self, name: &str, parent: &Context) -> Context {
        let tracer = self.provider.tracer(SCOPE);
        let span = tracer
            .span_builder(name.to_string())
            .with_kind(SpanKind::Server)
            .start_with_context(&tracer, parent);
        parent.with_span(span)
    }

    /// Write `cx` into outbound headers, replacing any previous values.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Flush and stop the exporter.
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}

/// Record the final status code on the span held by `cx`.
pub fn record_status(cx: &Context, status: u16) {
    let span = cx.span();
    span.set_attribute(KeyValue::new("http.response.status_code", i64::from(status)));
    if status >= 500 {
        span.set_status(Status::error(format!("status {status}")));
    }
}

/// Mark the span held by `cx` as failed.
pub fn record_error(cx: &Context, error: &dyn std::error::Error) {
    let span = cx.span();
    span.set_status(Status::error(error.to_string()));
    span.add_event("error", vec![KeyValue::new("error.message", error.to_string())]);
}

fn default_propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let name = HeaderName::from_bytes(key.as_bytes());
        let value = HeaderValue::from_str(&value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.0.insert(name, value);
        }
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (spans, trace context in/out of headers)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OTLP collector (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID and trace context flow through both services
//! - Metrics are cheap (no recorder means no-op)

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{Telemetry, TelemetryError};

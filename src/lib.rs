//! Postal code → current weather relay.
//!
//! Two services chained over HTTP: the edge validates an 8-digit postal code
//! and forwards it; the resolver looks up the locality, fetches current
//! conditions and answers Celsius, Fahrenheit and Kelvin. Trace context is
//! carried across every hop.

pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::{RelayConfig, Role};
pub use domain::{NormalizedWeatherResponse, RelayError};
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client
//!     → server.rs (middleware: request ID, logs, panic recovery, timeout)
//!     → edge.rs     validate → forward → relay          (edge role)
//!     → resolver.rs geocode → weather → convert          (resolver role)
//!     → response.rs (errors as JSON, span status, metrics)
//!     → client
//! ```

pub mod edge;
pub mod health;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::{RelayServer, ServerError};

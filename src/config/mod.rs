//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks for the selected role)
//!     → RelayConfig (validated, immutable)
//!     → copied into each service's handler state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    EdgeConfig, LogFormat, ObservabilityConfig, RelayConfig, ResolverConfig, Role, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};

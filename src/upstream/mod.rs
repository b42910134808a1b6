//! Outbound provider clients used by the resolver.
//!
//! # Data Flow
//! ```text
//! resolver handler
//!     → geocoding.rs (GET template{cep}, trace headers) → LocalityLookupResult
//!     → weather.rs (GET template{location,key}, trace headers) → WeatherQueryResult
//! ```
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by both providers
//! - Provider status codes are not interpreted; only the body decides
//! - No retries: the first failure is terminal

pub mod geocoding;
pub mod template;
pub mod weather;

pub use geocoding::GeocodingClient;
pub use template::UrlTemplate;
pub use weather::WeatherClient;

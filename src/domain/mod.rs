//! Request and response records for the relay pipeline.
//!
//! # Data Flow
//! ```text
//! client body
//!     → PostalCodeRequest (edge: PostalCode validation)
//!     → LocalityLookupResult (geocoding provider)
//!     → WeatherQueryResult (weather provider, "current" section)
//!     → NormalizedWeatherResponse (C, F, K)
//! ```
//!
//! # Design Decisions
//! - Every shape is a typed record; nothing is carried as a string map
//! - Failures are a closed enum with a fixed status per hop

pub mod error;
pub mod types;

pub use error::{Hop, RelayError};
pub use types::{
    LocalityLookupResult, NormalizedWeatherResponse, PostalCode, PostalCodeRequest,
    WeatherQueryResult, WeatherReport, KELVIN_OFFSET,
};

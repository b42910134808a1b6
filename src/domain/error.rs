//! Request-path failures and their HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// Outbound leg on which a transport or decode failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    /// Edge → Resolver.
    Resolver,
    /// Resolver → geocoding provider.
    Geocoding,
    /// Resolver → weather provider.
    Weather,
}

impl Hop {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hop::Resolver => "resolver",
            Hop::Geocoding => "geocoding",
            Hop::Weather => "weather",
        }
    }
}

impl std::fmt::Display for Hop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that terminate a single relayed request.
///
/// The `Display` text is the detailed reason used in logs; [`RelayError::message`]
/// is the short text returned to the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client body is not JSON or the postal code is malformed.
    #[error("invalid zipcode: {0}")]
    InvalidFormat(String),

    /// Transport failure reaching a downstream service.
    #[error("{hop} unreachable: {reason}")]
    UpstreamUnreachable { hop: Hop, reason: String },

    /// A downstream body could not be read or decoded.
    #[error("failed to decode {hop} response: {reason}")]
    InternalDecode { hop: Hop, reason: String },

    /// Geocoding answered but yielded no locality.
    #[error("no locality for postal code")]
    LocationNotFound,

    /// Weather provider unreachable or returned an unusable body.
    #[error("weather lookup failed: {0}")]
    WeatherLookupFailed(String),

    /// The per-request deadline passed before a response was ready.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Outbound request could not be constructed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP status returned to the caller.
    ///
    /// Transport failures map per hop: both the edge→resolver and the
    /// resolver→geocoding legs answer 404, the weather leg answers 500.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::UpstreamUnreachable { hop, .. } => match hop {
                Hop::Resolver | Hop::Geocoding => StatusCode::NOT_FOUND,
                Hop::Weather => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RelayError::InternalDecode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::LocationNotFound => StatusCode::NOT_FOUND,
            RelayError::WeatherLookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message placed in the JSON error body.
    pub fn message(&self) -> &'static str {
        match self {
            RelayError::InvalidFormat(_) => "invalid zipcode",
            RelayError::UpstreamUnreachable { .. } | RelayError::LocationNotFound => {
                "can not find zipcode"
            }
            RelayError::InternalDecode { .. } => "internal error",
            RelayError::WeatherLookupFailed(_) => {
                "can not find current weather for the given location"
            }
            RelayError::Timeout(_) => "request timed out",
            RelayError::Internal(_) => "internal error",
        }
    }
}

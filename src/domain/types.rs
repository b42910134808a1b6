//! Typed records exchanged at each hop.

use serde::{Deserialize, Serialize};

use crate::domain::error::RelayError;

/// Offset added to Celsius to produce the reported Kelvin value.
///
/// Kept at 273.0, not 273.15: consumers compare against this exact value.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Required length of a postal code.
const POSTAL_CODE_LEN: usize = 8;

/// Inbound body for both services: `{"cep": "..."}`.
///
/// `cep` is optional at the type level; the edge rejects an absent code, the
/// resolver forwards it as an empty string.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PostalCodeRequest {
    #[serde(default)]
    pub cep: Option<String>,
}

impl PostalCodeRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            cep: Some(code.into()),
        }
    }

    /// Code as given, or an empty string when absent.
    pub fn code_or_empty(&self) -> &str {
        self.cep.as_deref().unwrap_or_default()
    }
}

/// A postal code that passed edge validation: exactly eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(raw: &str) -> Result<Self, RelayError> {
        if raw.len() != POSTAL_CODE_LEN {
            return Err(RelayError::InvalidFormat(format!(
                "expected {} characters, got {}",
                POSTAL_CODE_LEN,
                raw.len()
            )));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RelayError::InvalidFormat("non-digit character".into()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Validate the `cep` field of an inbound request.
    pub fn from_request(request: &PostalCodeRequest) -> Result<Self, RelayError> {
        match request.cep.as_deref() {
            Some(raw) => Self::parse(raw),
            None => Err(RelayError::InvalidFormat("missing cep field".into())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geocoding provider answer.
///
/// ViaCEP names the field `localidade` and answers `{"erro": true}` for
/// unknown codes, which decodes to an empty locality.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LocalityLookupResult {
    #[serde(default, rename = "localidade", alias = "locality")]
    pub locality: String,
}

impl LocalityLookupResult {
    pub fn is_found(&self) -> bool {
        !self.locality.is_empty()
    }
}

/// Weather provider payload; only the `current` section is read.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub current: WeatherQueryResult,
}

/// Current reading from the weather provider.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct WeatherQueryResult {
    #[serde(rename = "temp_c", alias = "temp_C")]
    pub temperature_celsius: f64,
    #[serde(rename = "temp_f", alias = "temp_F")]
    pub temperature_fahrenheit: f64,
}

/// Resolver output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalizedWeatherResponse {
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl From<WeatherQueryResult> for NormalizedWeatherResponse {
    fn from(reading: WeatherQueryResult) -> Self {
        Self {
            temp_c: reading.temperature_celsius,
            temp_f: reading.temperature_fahrenheit,
            temp_k: reading.temperature_celsius + KELVIN_OFFSET,
        }
    }
}

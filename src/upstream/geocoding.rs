//! Postal code → locality lookup.

use std::sync::Arc;

use opentelemetry::Context;
use reqwest::header::HeaderMap;

use crate::domain::{Hop, LocalityLookupResult, RelayError};
use crate::observability::metrics;
use crate::observability::Telemetry;
use crate::upstream::UrlTemplate;

#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    template: UrlTemplate,
    telemetry: Arc<Telemetry>,
}

impl GeocodingClient {
    pub fn new(client: reqwest::Client, template: UrlTemplate, telemetry: Arc<Telemetry>) -> Self {
        Self {
            client,
            template,
            telemetry,
        }
    }

    /// Resolve `cep` to a locality.
    ///
    /// An empty `cep` is sent as-is; the provider decides what that means.
    pub async fn lookup(&self, cep: &str, cx: &Context) -> Result<String, RelayError> {
        let url = self.template.render(&[("cep", cep)]);
        let mut headers = HeaderMap::new();
        self.telemetry.inject(cx, &mut headers);

        tracing::debug!(url = %url, "Geocoding lookup");

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream(Hop::Geocoding.as_str(), "unreachable");
                RelayError::UpstreamUnreachable {
                    hop: Hop::Geocoding,
                    reason: e.to_string(),
                }
            })?;

        let body = response.bytes().await.map_err(|e| {
            metrics::record_upstream(Hop::Geocoding.as_str(), "decode_error");
            RelayError::InternalDecode {
                hop: Hop::Geocoding,
                reason: e.to_string(),
            }
        })?;

        let result: LocalityLookupResult = serde_json::from_slice(&body).map_err(|e| {
            metrics::record_upstream(Hop::Geocoding.as_str(), "decode_error");
            RelayError::InternalDecode {
                hop: Hop::Geocoding,
                reason: e.to_string(),
            }
        })?;

        if !result.is_found() {
            metrics::record_upstream(Hop::Geocoding.as_str(), "not_found");
            return Err(RelayError::LocationNotFound);
        }

        metrics::record_upstream(Hop::Geocoding.as_str(), "ok");
        Ok(result.locality)
    }
}

//! Locality → current conditions lookup.

use std::sync::Arc;

use opentelemetry::Context;
use reqwest::header::HeaderMap;

use crate::domain::{Hop, RelayError, WeatherQueryResult, WeatherReport};
use crate::observability::metrics;
use crate::observability::Telemetry;
use crate::upstream::UrlTemplate;

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    template: UrlTemplate,
    api_key: String,
    telemetry: Arc<Telemetry>,
}

impl WeatherClient {
    pub fn new(
        client: reqwest::Client,
        template: UrlTemplate,
        api_key: impl Into<String>,
        telemetry: Arc<Telemetry>,
    ) -> Self {
        Self {
            client,
            template,
            api_key: api_key.into(),
            telemetry,
        }
    }

    /// Fetch the current reading for `locality`.
    ///
    /// The locality is URL-escaped into the `{location}` slot. Transport,
    /// body and decode failures all surface as `WeatherLookupFailed`.
    pub async fn current(&self, locality: &str, cx: &Context) -> Result<WeatherQueryResult, RelayError> {
        let url = self
            .template
            .render(&[("location", locality), ("key", self.api_key.as_str())]);
        let mut headers = HeaderMap::new();
        self.telemetry.inject(cx, &mut headers);

        tracing::debug!(locality = %locality, "Weather lookup");

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| failed("unreachable", e.without_url()))?;

        let body = response.bytes().await.map_err(|e| failed("decode_error", e.without_url()))?;
        let report: WeatherReport =
            serde_json::from_slice(&body).map_err(|e| failed("decode_error", e))?;

        metrics::record_upstream(Hop::Weather.as_str(), "ok");
        Ok(report.current)
    }
}

fn failed(outcome: &'static str, error: impl std::fmt::Display) -> RelayError {
    metrics::record_upstream(Hop::Weather.as_str(), outcome);
    RelayError::WeatherLookupFailed(error.to_string())
}

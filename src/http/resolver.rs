//! Resolver handler: postal code → locality → current weather.
//!
//! The pipeline is linear; the first failing step answers:
//! geocoding unreachable 404, geocoding body undecodable 500, no locality
//! 404, weather failure 500. One span wraps the whole handler and its
//! context is injected into both provider calls.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::Context;

use crate::domain::{NormalizedWeatherResponse, PostalCodeRequest, RelayError};
use crate::http::request::request_id;
use crate::http::response::complete;
use crate::observability::Telemetry;
use crate::upstream::{GeocodingClient, WeatherClient};

/// State injected into the resolver handlers.
#[derive(Clone)]
pub struct ResolverState {
    pub geocoding: GeocodingClient,
    pub weather: WeatherClient,
    pub telemetry: Arc<Telemetry>,
    pub span_name: Arc<str>,
}

/// `POST /` with a `{"cep": "..."}` body.
pub async fn resolve_post(
    State(state): State<ResolverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = serde_json::from_slice::<PostalCodeRequest>(&body)
        .map_err(|e| RelayError::InvalidFormat(e.to_string()));
    resolve(&state, &headers, request).await
}

/// `GET /weather?cep=...`. An undecodable query string answers 422.
pub async fn resolve_get(
    State(state): State<ResolverState>,
    headers: HeaderMap,
    query: Result<Query<PostalCodeRequest>, QueryRejection>,
) -> Response {
    let request = query
        .map(|Query(request)| request)
        .map_err(|e| RelayError::InvalidFormat(e.body_text()));
    resolve(&state, &headers, request).await
}

async fn resolve(
    state: &ResolverState,
    headers: &HeaderMap,
    request: Result<PostalCodeRequest, RelayError>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(headers).to_string();
    let parent = state.telemetry.extract(headers);
    let cx = state.telemetry.start_span(&state.span_name, &parent);

    let result = match request {
        Ok(request) => lookup(state, request.code_or_empty(), &cx, &request_id)
            .await
            .map(|weather| (StatusCode::OK, Json(weather)).into_response()),
        Err(e) => Err(e),
    };
    complete("resolver", &request_id, &cx, start, result)
}

async fn lookup(
    state: &ResolverState,
    cep: &str,
    cx: &Context,
    request_id: &str,
) -> Result<NormalizedWeatherResponse, RelayError> {
    let locality = state.geocoding.lookup(cep, cx).await?;
    tracing::debug!(request_id = %request_id, cep = %cep, locality = %locality, "Locality resolved");

    let reading = state.weather.current(&locality, cx).await?;
    let normalized = NormalizedWeatherResponse::from(reading);
    tracing::info!(
        request_id = %request_id,
        cep = %cep,
        locality = %locality,
        temp_c = normalized.temp_c,
        temp_k = normalized.temp_k,
        "Weather resolved"
    );
    Ok(normalized)
}

//! Edge handler: validate the postal code and forward it to the resolver.
//!
//! # Responsibilities
//! - Reject bodies that are not JSON or carry a malformed `cep` (422)
//! - Re-encode the validated body and send it with the configured method/URL
//! - Inject trace context and the request ID into the forwarded call
//! - Relay the resolver's status and body as-is
//!
//! # Design Decisions
//! - Any status received from the resolver is passed through; fixed codes
//!   are used only for failures detected here
//! - Transport failure reaching the resolver answers 404

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use opentelemetry::Context;

use crate::domain::{Hop, PostalCode, PostalCodeRequest, RelayError};
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::response::complete;
use crate::observability::metrics;
use crate::observability::Telemetry;
use crate::upstream::UrlTemplate;

/// Forwarding target and span label.
#[derive(Debug, Clone)]
pub struct EdgeSettings {
    pub method: Method,
    pub url: UrlTemplate,
    pub span_name: String,
    pub max_response_bytes: usize,
}

/// State injected into the edge handler.
#[derive(Clone)]
pub struct EdgeState {
    pub settings: Arc<EdgeSettings>,
    pub client: Client<HttpConnector, Body>,
    pub telemetry: Arc<Telemetry>,
}

/// `POST /` and `POST /cep`.
pub async fn edge_handler(
    State(state): State<EdgeState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();
    let parent = state.telemetry.extract(&headers);
    let cx = state.telemetry.start_span(&state.settings.span_name, &parent);

    let result = forward(&state, &headers, &body, &cx).await;
    complete("edge", &request_id, &cx, start, result)
}

async fn forward(
    state: &EdgeState,
    inbound: &HeaderMap,
    body: &[u8],
    cx: &Context,
) -> Result<Response, RelayError> {
    let request: PostalCodeRequest =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidFormat(e.to_string()))?;
    let code = PostalCode::from_request(&request)?;

    let payload = serde_json::to_vec(&PostalCodeRequest::new(code.as_str()))
        .map_err(|e| RelayError::Internal(e.to_string()))?;
    let url = state.settings.url.render(&[("cep", code.as_str())]);

    let mut builder = Request::builder()
        .method(state.settings.method.clone())
        .uri(url.as_str())
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(headers) = builder.headers_mut() {
        if let Some(id) = inbound.get(X_REQUEST_ID) {
            headers.insert(X_REQUEST_ID, id.clone());
        }
        state.telemetry.inject(cx, headers);
    }
    let outbound = builder
        .body(Body::from(payload))
        .map_err(|e| RelayError::Internal(e.to_string()))?;

    tracing::debug!(
        request_id = %request_id(inbound),
        cep = %code,
        method = %state.settings.method,
        url = %url,
        "Forwarding to resolver"
    );

    let upstream = state.client.request(outbound).await.map_err(|e| {
        metrics::record_upstream(Hop::Resolver.as_str(), "unreachable");
        RelayError::UpstreamUnreachable {
            hop: Hop::Resolver,
            reason: e.to_string(),
        }
    })?;

    let status = upstream.status();
    let bytes = axum::body::to_bytes(Body::new(upstream.into_body()), state.settings.max_response_bytes)
        .await
        .map_err(|e| {
            metrics::record_upstream(Hop::Resolver.as_str(), "decode_error");
            RelayError::InternalDecode {
                hop: Hop::Resolver,
                reason: e.to_string(),
            }
        })?;

    metrics::record_upstream(Hop::Resolver.as_str(), "ok");
    Ok((status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

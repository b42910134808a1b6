//! Response construction.
//!
//! # Responsibilities
//! - Turn a `RelayError` into a JSON error body with its mapped status
//! - Close out a handled request: span status, metrics, logs
//!
//! # Design Decisions
//! - Every failure body is `{"message": "..."}` with `application/json`
//! - Detailed reasons go to logs and the span, never to the caller

use std::time::{Duration, Instant};

use axum::{
    BoxError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::Context;
use serde::{Deserialize, Serialize};

use crate::domain::RelayError;
use crate::observability::metrics;
use crate::observability::tracing::{record_error, record_status};

/// JSON body of every failure response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Finish a handled request for `service`.
pub fn complete(
    service: &'static str,
    request_id: &str,
    cx: &Context,
    start: Instant,
    result: Result<Response, RelayError>,
) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                service = service,
                request_id = %request_id,
                status = %e.status(),
                error = %e,
                "Request failed"
            );
            record_error(cx, &e);
            e.into_response()
        }
    };

    let status = response.status().as_u16();
    record_status(cx, status);
    metrics::record_request(service, status, start);
    tracing::debug!(service = service, request_id = %request_id, status, "Request complete");
    response
}

/// Response used when the per-request timeout, or any other middleware
/// failure, ends a request before its handler answers.
pub async fn middleware_error_response(deadline: Duration, error: BoxError) -> Response {
    let error = if error.is::<tower::timeout::error::Elapsed>() {
        RelayError::Timeout(deadline)
    } else {
        RelayError::Internal(error.to_string())
    };
    tracing::warn!(status = %error.status(), error = %error, "Request aborted");
    error.into_response()
}

/// Response used when a handler panics.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    let body = ErrorBody {
        message: "internal error".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

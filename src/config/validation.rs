//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is collected so
//! a bad file is reported in one pass.

use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{EdgeConfig, RelayConfig, ResolverConfig, Role};
use crate::upstream::UrlTemplate;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate the shared sections plus the section for `role`.
pub fn validate_config(config: &RelayConfig, role: Role) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    match role {
        Role::Edge => validate_edge(&config.edge, &mut errors),
        Role::Resolver => validate_resolver(&config.resolver, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_edge(edge: &EdgeConfig, errors: &mut Vec<ValidationError>) {
    check_bind_address("edge.bind_address", &edge.bind_address, errors);
    check_span_name("edge.span_name", &edge.span_name, errors);
    check_body_limit("edge.max_body_bytes", edge.max_body_bytes, errors);
    check_body_limit("edge.max_response_bytes", edge.max_response_bytes, errors);

    if Method::from_bytes(edge.method.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "edge.method",
            format!("'{}' is not an HTTP method", edge.method),
        ));
    }

    // Forwarding goes through a plain HTTP connector.
    match url::Url::parse(&edge.url) {
        Ok(parsed) if parsed.scheme() == "http" => {}
        Ok(parsed) => errors.push(ValidationError::new(
            "edge.url",
            format!("scheme '{}' not supported, use http", parsed.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("edge.url", e.to_string())),
    }
    check_slots("edge.url", &UrlTemplate::new(edge.url.as_str()), &[], &["cep"], errors);
}

fn validate_resolver(resolver: &ResolverConfig, errors: &mut Vec<ValidationError>) {
    check_bind_address("resolver.bind_address", &resolver.bind_address, errors);
    check_span_name("resolver.span_name", &resolver.span_name, errors);
    check_body_limit("resolver.max_body_bytes", resolver.max_body_bytes, errors);

    check_slots(
        "resolver.geocoding_url",
        &UrlTemplate::new(resolver.geocoding_url.as_str()),
        &["cep"],
        &[],
        errors,
    );
    check_slots(
        "resolver.weather_url",
        &UrlTemplate::new(resolver.weather_url.as_str()),
        &["location"],
        &["key"],
        errors,
    );
}

fn check_bind_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            field,
            format!("'{value}' is not a socket address"),
        ));
    }
}

fn check_span_name(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    }
}

fn check_body_limit(field: &'static str, value: usize, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError::new(field, "must be greater than 0"));
    }
}

fn check_slots(
    field: &'static str,
    template: &UrlTemplate,
    required: &[&str],
    optional: &[&str],
    errors: &mut Vec<ValidationError>,
) {
    let present = template.placeholders();
    for name in required {
        if !present.contains(name) {
            errors.push(ValidationError::new(field, format!("missing {{{name}}} placeholder")));
        }
    }
    for name in &present {
        if !required.contains(name) && !optional.contains(name) {
            errors.push(ValidationError::new(field, format!("unknown {{{name}}} placeholder")));
        }
    }
}

//! Configuration schema definitions.
//!
//! One file configures either service; only the section for the role being
//! started is read. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Which service a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Validates the postal code and forwards to the resolver.
    Edge,
    /// Resolves postal code → locality → current weather.
    Resolver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Edge => "edge",
            Role::Resolver => "resolver",
        }
    }

    /// Service name reported to the tracing backend when none is configured.
    pub fn default_service_name(&self) -> &'static str {
        match self {
            Role::Edge => "cep-edge",
            Role::Resolver => "cep-resolver",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Edge service settings.
    pub edge: EdgeConfig,

    /// Resolver service settings.
    pub resolver: ResolverConfig,
}

impl RelayConfig {
    /// Bind address of the given role.
    pub fn bind_address(&self, role: Role) -> &str {
        match role {
            Role::Edge => &self.edge.bind_address,
            Role::Resolver => &self.resolver.bind_address,
        }
    }

    /// Service name for traces, falling back to the role default.
    pub fn service_name(&self, role: Role) -> String {
        if self.observability.service_name.trim().is_empty() {
            role.default_service_name().to_string()
        } else {
            self.observability.service_name.clone()
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-request timeout enforced by the server middleware, in seconds.
    /// Expiry drops the handler, cancelling any in-flight outbound call.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// OTLP/HTTP traces endpoint. Empty disables export; spans are still
    /// created and their context still propagated.
    pub otlp_endpoint: String,

    /// Service name attached to exported spans.
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            otlp_endpoint: String::new(),
            service_name: String::new(),
        }
    }
}

/// Edge service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,

    /// Method used for the forwarded call.
    pub method: String,

    /// Resolver URL. May contain `{cep}`.
    pub url: String,

    /// Name of the span wrapping the forwarded call.
    pub span_name: String,

    /// Largest accepted request body.
    pub max_body_bytes: usize,

    /// Largest resolver response relayed back to the caller. Anything bigger
    /// answers 500.
    pub max_response_bytes: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
            method: "POST".to_string(),
            url: "http://localhost:8080/".to_string(),
            span_name: "forward-to-resolver".to_string(),
            max_body_bytes: 64 * 1024,
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// Resolver service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Geocoding URL template; must contain `{cep}`.
    pub geocoding_url: String,

    /// Weather URL template; must contain `{location}`, may contain `{key}`.
    pub weather_url: String,

    /// Substituted for `{key}` in `weather_url`.
    pub weather_api_key: String,

    /// Name of the span wrapping the whole resolution.
    pub span_name: String,

    /// Largest accepted request body.
    pub max_body_bytes: usize,

    /// Route provider calls through `HTTP_PROXY`/`HTTPS_PROXY` when set.
    pub use_system_proxy: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            geocoding_url: "https://viacep.com.br/ws/{cep}/json/".to_string(),
            weather_url:
                "https://api.weatherapi.com/v1/current.json?key={key}&q={location}&aqi=no"
                    .to_string(),
            weather_api_key: String::new(),
            span_name: "resolve-weather".to_string(),
            max_body_bytes: 64 * 1024,
            use_system_proxy: true,
        }
    }
}

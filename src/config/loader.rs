//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RelayConfig, Role};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration for `role` from TOML text.
pub fn parse_config(content: &str, role: Role) -> Result<RelayConfig, ConfigError> {
    let config: RelayConfig = toml::from_str(content)?;
    validate_config(&config, role).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path, role: Role) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, role)
}

/// Load from `path` when given, otherwise validate and return the defaults.
pub fn load_or_default(path: Option<&Path>, role: Role) -> Result<RelayConfig, ConfigError> {
    match path {
        Some(path) => load_config(path, role),
        None => {
            let config = RelayConfig::default();
            validate_config(&config, role).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [edge]
            url = "http://resolver:8080/"
            "#,
            Role::Edge,
        )
        .unwrap();

        assert_eq!(config.edge.url, "http://resolver:8080/");
        assert_eq!(config.edge.method, "POST");
        assert_eq!(config.timeouts.request_secs, 60);
        assert_eq!(config.service_name(Role::Edge), "cep-edge");
    }

    #[test]
    fn test_resolver_section() {
        let config = parse_config(
            r#"
            [observability]
            log_format = "json"
            service_name = "weather-b"

            [resolver]
            bind_address = "127.0.0.1:9000"
            geocoding_url = "http://geo.local/ws/{cep}/json/"
            weather_url = "http://wx.local/current?q={location}"
            "#,
            Role::Resolver,
        )
        .unwrap();

        assert_eq!(config.bind_address(Role::Resolver), "127.0.0.1:9000");
        assert_eq!(config.service_name(Role::Resolver), "weather-b");
        assert_eq!(
            config.observability.log_format,
            crate::config::schema::LogFormat::Json
        );
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = parse_config(
            r#"
            [resolver]
            geocoding_url = "http://geo.local/ws/json/"
            "#,
            Role::Resolver,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_toml() {
        let err = parse_config("[edge\nurl = 1", Role::Edge).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_defaults_are_valid_for_both_roles() {
        assert!(load_or_default(None, Role::Edge).is_ok());
        assert!(load_or_default(None, Role::Resolver).is_ok());
    }
}

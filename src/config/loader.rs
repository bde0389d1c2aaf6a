//! Configuration loading from the environment and an optional TOML file.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names a TOML file to load before environment overrides are applied.
pub const CONFIG_PATH_ENV: &str = "FLAREPROXY_CONFIG";
/// Solver command endpoint.
pub const SOLVER_URL_ENV: &str = "FLARESOLVERR_URL";
pub const BIND_ADDRESS_ENV: &str = "FLAREPROXY_BIND_ADDRESS";
pub const STARTUP_DELAY_ENV: &str = "FLAREPROXY_STARTUP_DELAY_SECS";
pub const METRICS_ADDRESS_ENV: &str = "FLAREPROXY_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

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

/// Read a TOML configuration file. Missing sections and keys keep their
/// defaults; validation happens once all overrides are applied.
pub fn parse_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    load_with(|name| std::env::var(name).ok())
}

/// Build a validated configuration from defaults, an optional file, and
/// variables resolved through `lookup`.
pub fn load_with<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV) {
        Some(path) => parse_file(Path::new(&path))?,
        None => ProxyConfig::default(),
    };

    if let Some(url) = lookup(SOLVER_URL_ENV) {
        config.solver.url = url;
    }
    if let Some(addr) = lookup(BIND_ADDRESS_ENV) {
        config.listener.bind_address = addr;
    }
    if let Some(delay) = lookup(STARTUP_DELAY_ENV) {
        config.solver.startup_delay_secs = delay.trim().parse().map_err(|_| ConfigError::Env {
            name: STARTUP_DELAY_ENV,
            value: delay.clone(),
        })?;
    }
    if let Some(addr) = lookup(METRICS_ADDRESS_ENV) {
        config.observability.metrics_address = Some(addr).filter(|a| !a.is_empty());
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the solver endpoint URL
//! - Keep the client-facing timeout above the solver network timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("solver.url {0:?} is not an http(s) URL")]
    SolverUrl(String),

    #[error("solver.max_timeout_ms must be greater than zero")]
    ZeroSolverTimeout,

    #[error("timeouts.request_secs ({request_secs}s) must exceed the solver network timeout ({solver_ms}ms)")]
    RequestTimeoutTooShort { request_secs: u64, solver_ms: u128 },

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    match url::Url::parse(&config.solver.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::SolverUrl(config.solver.url.clone())),
    }

    if config.solver.max_timeout_ms == 0 {
        errors.push(ValidationError::ZeroSolverTimeout);
    }

    let solver_timeout = config.solver.network_timeout();
    if u128::from(config.timeouts.request_secs) * 1000 <= solver_timeout.as_millis() {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            solver_ms: solver_timeout.as_millis(),
        });
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

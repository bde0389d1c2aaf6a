//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Solver service endpoint and command settings.
    pub solver: SolverConfig,

    /// Client-facing timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound on a POST body read from a client.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Solver service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Command endpoint (e.g., "http://flaresolverr:8191/v1").
    pub url: String,

    /// `maxTimeout` sent with every request command, in milliseconds.
    pub max_timeout_ms: u64,

    /// Extra time the outbound HTTP call waits beyond `max_timeout_ms`.
    pub network_slack_ms: u64,

    /// Fixed delay before the first command is sent at startup.
    pub startup_delay_secs: u64,
}

impl SolverConfig {
    /// Timeout applied to the HTTP call carrying a command.
    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.max_timeout_ms.saturating_add(self.network_slack_ms))
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            url: "http://flaresolverr:8191/v1".to_string(),
            max_timeout_ms: 60_000,
            network_slack_ms: 5_000,
            startup_delay_secs: 0,
        }
    }
}

/// Timeout configuration for client-facing requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time a client request may take, solver call included.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 90 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address. Metrics export is off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

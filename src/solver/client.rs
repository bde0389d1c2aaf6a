//! HTTP client for the solver command endpoint.
//!
//! # Responsibilities
//! - POST commands as JSON to the configured endpoint
//! - Bound every call by the command timeout plus network slack
//! - Acquire and list sessions without ever failing the caller

use axum::http::StatusCode;
use std::time::Instant;
use thiserror::Error;

use crate::config::SolverConfig;
use crate::observability::metrics;
use crate::solver::command::Command;
use crate::solver::envelope::SolverReply;
use crate::solver::session::Session;

/// Errors talking to the solver service.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The HTTP client could not be constructed.
    #[error("failed to build solver client: {0}")]
    Build(#[source] reqwest::Error),

    /// The call did not complete within the network timeout.
    #[error("solver did not answer within {0} ms")]
    Timeout(u128),

    /// Connection, protocol or body read failure.
    #[error("solver request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Client for the solver's JSON command API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SolverClient {
    http: reqwest::Client,
    endpoint: String,
    max_timeout_ms: u64,
    network_timeout_ms: u128,
}

impl SolverClient {
    pub fn new(config: &SolverConfig) -> Result<Self, SolverError> {
        let network_timeout = config.network_timeout();
        // Proxy env vars must not reroute solver calls back through us.
        let http = reqwest::Client::builder()
            .timeout(network_timeout)
            .no_proxy()
            .build()
            .map_err(SolverError::Build)?;

        Ok(Self {
            http,
            endpoint: config.url.clone(),
            max_timeout_ms: config.max_timeout_ms,
            network_timeout_ms: network_timeout.as_millis(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `maxTimeout` to put on request commands.
    pub fn max_timeout_ms(&self) -> u64 {
        self.max_timeout_ms
    }

    /// Send one command and decode whatever comes back.
    pub async fn send(&self, command: &Command) -> Result<SolverReply, SolverError> {
        let start = Instant::now();
        let result = self.exchange(command).await;

        let outcome = match &result {
            Ok(SolverReply::Envelope { .. }) => "json",
            Ok(SolverReply::Raw { .. }) => "raw",
            Err(SolverError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        metrics::record_solver_call(command.cmd.as_str(), outcome, start);

        result
    }

    async fn exchange(&self, command: &Command) -> Result<SolverReply, SolverError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(command)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        tracing::debug!(
            cmd = %command.cmd,
            status = %status,
            bytes = body.len(),
            "Solver replied"
        );

        Ok(SolverReply::decode(status, body))
    }

    fn classify(&self, error: reqwest::Error) -> SolverError {
        if error.is_timeout() {
            SolverError::Timeout(self.network_timeout_ms)
        } else {
            SolverError::Transport(error)
        }
    }

    /// Ask the solver for a new browser session.
    ///
    /// Any failure yields an absent session; the proxy keeps working without
    /// one and the solver creates a throwaway context per request.
    pub async fn create_session(&self) -> Session {
        let reply = match self.send(&Command::sessions_create()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Error creating session");
                return Session::none();
            }
        };

        match &reply {
            SolverReply::Envelope { status, envelope }
                if *status == StatusCode::OK && envelope.is_ok() =>
            {
                match envelope.session() {
                    Some(id) => {
                        tracing::info!(session = %id, "Session created");
                        Session::new(id)
                    }
                    None => {
                        tracing::warn!(reply = %envelope.as_value(), "Session reply carried no id");
                        Session::none()
                    }
                }
            }
            SolverReply::Envelope { status, envelope } => {
                tracing::warn!(
                    status = %status,
                    reply = %envelope.as_value(),
                    "Failed to create session"
                );
                Session::none()
            }
            SolverReply::Raw { status, body } => {
                tracing::warn!(
                    status = %status,
                    body = %String::from_utf8_lossy(body),
                    "Failed to create session: reply was not JSON"
                );
                Session::none()
            }
        }
    }

    /// List the solver's active session ids. Empty on any failure.
    pub async fn list_sessions(&self) -> Vec<String> {
        match self.send(&Command::sessions_list()).await {
            Ok(SolverReply::Envelope { status, envelope })
                if status == StatusCode::OK && envelope.is_ok() =>
            {
                let sessions = envelope.sessions();
                tracing::info!(sessions = ?sessions, "Active sessions");
                sessions
            }
            Ok(reply) => {
                tracing::warn!(status = %reply.status(), "Failed to list sessions");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error listing sessions");
                Vec::new()
            }
        }
    }
}

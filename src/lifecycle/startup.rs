//! Startup orchestration.
//!
//! # Responsibilities
//! - Give the solver time to come up (fixed delay, optional)
//! - Acquire the process-wide session before traffic is accepted
//! - Log the solver's active sessions for diagnostics

use std::time::Duration;

use crate::config::SolverConfig;
use crate::solver::{Session, SolverClient};

/// Sleep for the configured startup delay, if any.
pub async fn wait_for_solver(config: &SolverConfig) {
    if config.startup_delay_secs == 0 {
        return;
    }
    tracing::info!(
        delay_secs = config.startup_delay_secs,
        solver = %config.url,
        "Waiting for solver to start"
    );
    tokio::time::sleep(Duration::from_secs(config.startup_delay_secs)).await;
}

/// Create the session every request will carry.
///
/// Never fails: an unreachable or misbehaving solver leaves the proxy
/// running session-less. The listing is observational only.
pub async fn establish_session(client: &SolverClient) -> Session {
    let session = client.create_session().await;
    if !session.is_established() {
        tracing::warn!(solver = %client.endpoint(), "Continuing without a solver session");
    }

    let active = client.list_sessions().await;
    tracing::debug!(count = active.len(), session = %session, "Session state at startup");

    session
}

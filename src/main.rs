//! flareproxy
//!
//! ```text
//!     Client Request         ┌──────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ dispatch ──▶ translator ──▶ solver client ─┼──▶ Solver
//!                            │      │                                       │    service
//!     Client Response        │      ▼ CONNECT: 501                          │
//!     ◀──────────────────────┼── reconstructor ◀──── envelope decode ◀──────┼───
//!                            │                                              │
//!                            │   session (created once at startup)          │
//!                            └──────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use flareproxy::config::load_from_env;
use flareproxy::lifecycle::{signals, startup, Shutdown};
use flareproxy::observability::{logging, metrics};
use flareproxy::{HttpServer, SolverClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;
    logging::init(&config.observability);

    tracing::info!("flareproxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        solver = %config.solver.url,
        max_timeout_ms = config.solver.max_timeout_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    let solver = SolverClient::new(&config.solver)?;

    startup::wait_for_solver(&config.solver).await;
    let session = startup::establish_session(&solver).await;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_after(signals::shutdown_signal()));

    HttpServer::new(config, solver, session)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

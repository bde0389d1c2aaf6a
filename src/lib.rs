//! FlareSolverr translating proxy.
//!
//! Accepts plain HTTP proxy traffic and replays each GET/POST through a
//! solver service that runs it in a real browser, then relays the captured
//! response to the client.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod solver;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use solver::{Session, SolverClient};

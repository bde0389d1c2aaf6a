//! Solver service integration.
//!
//! # Data Flow
//! ```text
//! Command (command.rs)
//!     → client.rs (JSON POST, network timeout)
//!     → envelope.rs (JSON envelope or raw passthrough)
//!
//! Startup only:
//!     client.rs sessions.create → Session (session.rs), held for process lifetime
//! ```

pub mod client;
pub mod command;
pub mod envelope;
pub mod session;

pub use client::{SolverClient, SolverError};
pub use command::{Command, CommandKind, PostData};
pub use envelope::{Envelope, SolutionBody, SolverReply};
pub use session::Session;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (Axum setup, method dispatch)
//!     → request.rs (request ID)
//!     → translator.rs (command from target.rs URL + body)
//!     → solver service
//!     → response.rs (reconstruct status, content type, body)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod target;
pub mod translator;

pub use error::ProxyError;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, CONNECT_NOT_SUPPORTED};

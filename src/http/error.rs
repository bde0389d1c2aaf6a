//! Per-request failure taxonomy and its HTTP rendering.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::solver::SolverError;

/// Anything that stops one request from being translated.
///
/// Every variant renders as a JSON body `{"error": "<message>"}`, so the
/// client always gets a well-formed reply.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method {0} is not supported; use GET or POST")]
    MethodNotAllowed(Method),

    #[error("Request body of {declared} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Request did not complete within {0} seconds")]
    Timeout(u64),

    /// A middleware layer failed before the handler produced a response.
    #[error("Request handling failed: {0}")]
    Layer(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn unsupported_method_is_405_json() {
        let response = ProxyError::MethodNotAllowed(Method::DELETE).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn other_failures_are_500() {
        let err = ProxyError::BodyTooLarge { declared: 10, limit: 5 };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Request body of 10 bytes exceeds the 5 byte limit"
        );
    }

    #[tokio::test]
    async fn timeout_renders_json_error() {
        let response = ProxyError::Timeout(3).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Request did not complete within 3 seconds");
    }
}

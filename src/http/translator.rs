//! Request translation.
//!
//! # Responsibilities
//! - Map one inbound GET/POST onto exactly one solver command
//! - Read POST bodies bounded by their declared length
//! - Send the command and hand the reply to the reconstructor

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request},
    response::{IntoResponse, Response},
};

use crate::http::error::ProxyError;
use crate::http::request::request_id;
use crate::http::response::reconstruct;
use crate::http::server::AppState;
use crate::http::target::resolve_target_url;
use crate::solver::{Command, PostData, SolverReply};

/// Translate, dispatch, and reconstruct one request.
pub async fn translate(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let target = resolve_target_url(&parts.uri, &parts.headers);
    let max_timeout = state.solver.max_timeout_ms();

    let command = match parts.method {
        Method::GET => Command::request_get(target, max_timeout, &state.session),
        Method::POST => {
            let body = read_post_body(&parts.headers, body, state.max_body_bytes).await?;
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            Command::request_post(
                target,
                max_timeout,
                &state.session,
                PostData { body, content_type },
            )
        }
        other => return Err(ProxyError::MethodNotAllowed(other)),
    };

    tracing::info!(
        request_id = %request_id,
        cmd = %command.cmd,
        url = command.url.as_deref().unwrap_or_default(),
        session = %state.session,
        "Forwarding to solver"
    );

    let reply = state.solver.send(&command).await?;

    match &reply {
        SolverReply::Envelope { status, envelope } if !envelope.is_ok() => {
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                solver_status = envelope.status().unwrap_or("missing"),
                message = envelope.message().unwrap_or_default(),
                "Solver reported failure"
            );
        }
        SolverReply::Raw { status, .. } => {
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                "Solver reply was not JSON, relaying as text"
            );
        }
        SolverReply::Envelope { .. } => {}
    }

    Ok(reconstruct(reply).into_response())
}

/// Declared `Content-Length`, if present and numeric.
pub fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Read a POST body of exactly the declared length.
///
/// A missing or zero length means an empty body and no read at all. Bytes
/// that are not UTF-8 are replaced rather than rejected.
pub async fn read_post_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<String, ProxyError> {
    let declared = match declared_length(headers) {
        None | Some(0) => return Ok(String::new()),
        Some(len) => len,
    };
    if declared > limit {
        return Err(ProxyError::BodyTooLarge { declared, limit });
    }

    let bytes = axum::body::to_bytes(body, declared).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_length(len: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_str(len).unwrap());
        headers
    }

    #[tokio::test]
    async fn reads_declared_bytes() {
        let body = read_post_body(&with_length("13"), Body::from("user=a&pass=b"), 1024)
            .await
            .unwrap();
        assert_eq!(body, "user=a&pass=b");
    }

    #[tokio::test]
    async fn zero_or_missing_length_is_empty() {
        let body = read_post_body(&with_length("0"), Body::from("ignored"), 1024)
            .await
            .unwrap();
        assert!(body.is_empty());

        let body = read_post_body(&HeaderMap::new(), Body::from("ignored"), 1024)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_refused_before_reading() {
        let err = read_post_body(&with_length("4096"), Body::empty(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::BodyTooLarge { declared: 4096, limit: 1024 }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let body = read_post_body(&with_length("3"), Body::from(vec![b'a', 0xff, b'b']), 1024)
            .await
            .unwrap();
        assert_eq!(body, "a\u{fffd}b");
    }

    #[test]
    fn unparsable_length_is_ignored() {
        assert_eq!(declared_length(&with_length("ten")), None);
        assert_eq!(declared_length(&with_length("10")), Some(10));
    }
}

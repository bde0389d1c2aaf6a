//! Response reconstruction.
//!
//! # Responsibilities
//! - Turn a solver reply into the response the client sees
//! - Pick the content type from the captured headers
//! - Serialize whatever body shape the solver produced
//!
//! # Design Decisions
//! - The client sees the solver call's own HTTP status
//! - Non-JSON replies are relayed verbatim as text/plain
//! - Every fallback is a named constant or variant, never a swallowed error

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::solver::{SolutionBody, SolverReply};

/// Content type used when the captured response names none.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type for replies the solver sent as something other than JSON.
pub const PASSTHROUGH_CONTENT_TYPE: &str = "text/plain";

/// Body of a reconstructed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    /// Captured page text, written as UTF-8.
    Text(String),
    /// Raw bytes, written unchanged.
    Bytes(Bytes),
    /// A JSON value that is neither text nor bytes; written JSON-encoded.
    Json(Value),
}

impl ResponseBody {
    pub fn into_bytes(self) -> Bytes {
        match self {
            ResponseBody::Empty => Bytes::new(),
            ResponseBody::Text(text) => Bytes::from(text),
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::Json(value) => Bytes::from(value.to_string()),
        }
    }
}

impl From<SolutionBody> for ResponseBody {
    fn from(body: SolutionBody) -> Self {
        match body {
            SolutionBody::Plain(text) => ResponseBody::Text(text),
            SolutionBody::Structured { body, .. } => match body {
                None | Some(Value::Null) => ResponseBody::Empty,
                Some(Value::String(text)) => ResponseBody::Text(text),
                Some(other) => ResponseBody::Json(other),
            },
            SolutionBody::Other(value) => ResponseBody::Json(value),
            SolutionBody::Absent => ResponseBody::Empty,
        }
    }
}

/// The response relayed to the original client.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstructed {
    pub status: StatusCode,
    pub content_type: String,
    pub body: ResponseBody,
}

/// Build the client response for a solver reply.
pub fn reconstruct(reply: SolverReply) -> Reconstructed {
    match reply {
        SolverReply::Raw { status, body } => Reconstructed {
            status,
            content_type: PASSTHROUGH_CONTENT_TYPE.to_string(),
            body: ResponseBody::Bytes(body),
        },
        SolverReply::Envelope { status, envelope } => Reconstructed {
            status,
            content_type: envelope
                .content_type()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            body: envelope.solution_body().into(),
        },
    }
}

impl IntoResponse for Reconstructed {
    fn into_response(self) -> Response {
        // Captured header values can hold bytes a HeaderValue rejects.
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        let mut response = Response::new(Body::from(self.body.into_bytes()));
        *response.status_mut() = self.status;
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Envelope;
    use serde_json::json;

    fn envelope_reply(status: StatusCode, value: Value) -> SolverReply {
        SolverReply::Envelope {
            status,
            envelope: Envelope::from_value(value),
        }
    }

    #[test]
    fn plain_body_with_captured_content_type() {
        let out = reconstruct(envelope_reply(
            StatusCode::OK,
            json!({"status": "ok", "solution": {"response": "<html>OK</html>", "headers": {"Content-Type": "text/html"}}}),
        ));
        assert_eq!(out.status, StatusCode::OK);
        assert_eq!(out.content_type, "text/html");
        assert_eq!(out.body, ResponseBody::Text("<html>OK</html>".into()));
    }

    #[test]
    fn nested_body_replaces_outer_object() {
        let out = reconstruct(envelope_reply(
            StatusCode::OK,
            json!({"status": "ok", "solution": {"response": {"body": "inner", "url": "https://x"}}}),
        ));
        assert_eq!(out.body, ResponseBody::Text("inner".into()));
        assert_eq!(out.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn missing_body_is_empty_not_an_error() {
        let out = reconstruct(envelope_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"status": "error", "message": "Error solving the challenge."}),
        ));
        assert_eq!(out.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(out.body, ResponseBody::Empty);

        let out = reconstruct(envelope_reply(
            StatusCode::OK,
            json!({"solution": {"response": {"url": "https://x"}}}),
        ));
        assert_eq!(out.body, ResponseBody::Empty);
    }

    #[test]
    fn non_text_bodies_are_json_encoded() {
        let out = reconstruct(envelope_reply(
            StatusCode::OK,
            json!({"solution": {"response": {"body": {"items": [1, 2]}}}}),
        ));
        assert_eq!(out.body.into_bytes(), Bytes::from_static(br#"{"items":[1,2]}"#));

        let out = reconstruct(envelope_reply(StatusCode::OK, json!({"solution": {"response": 42}})));
        assert_eq!(out.body.into_bytes(), Bytes::from_static(b"42"));
    }

    #[test]
    fn raw_reply_passes_through() {
        let out = reconstruct(SolverReply::Raw {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Bytes::from_static(b"Service Unavailable"),
        });
        assert_eq!(out.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(out.content_type, PASSTHROUGH_CONTENT_TYPE);
        assert_eq!(out.body.into_bytes(), Bytes::from_static(b"Service Unavailable"));
    }

    #[test]
    fn unrepresentable_content_type_falls_back() {
        let response = Reconstructed {
            status: StatusCode::OK,
            content_type: "text/html\nX-Injected: 1".into(),
            body: ResponseBody::Empty,
        }
        .into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            DEFAULT_CONTENT_TYPE
        );
    }
}

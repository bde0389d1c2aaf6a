//! Solver reply decoding.
//!
//! The solver's JSON envelope has no fixed shape: the captured page may sit
//! directly in `solution.response` as a string, or one level deeper under
//! `solution.response.body`, and headers may or may not be present. Decoding
//! therefore only fails when the reply is not JSON at all; every other shape
//! mismatch resolves to a named fallback.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{Map, Value};

/// A decoded reply to one command.
#[derive(Debug, Clone)]
pub enum SolverReply {
    /// The reply body parsed as JSON.
    Envelope { status: StatusCode, envelope: Envelope },
    /// The reply body was not JSON; relayed verbatim.
    Raw { status: StatusCode, body: Bytes },
}

impl SolverReply {
    /// Classify a reply body by whether it parses as JSON.
    pub fn decode(status: StatusCode, body: Bytes) -> Self {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => SolverReply::Envelope {
                status,
                envelope: Envelope::from_value(value),
            },
            Err(_) => SolverReply::Raw { status, body },
        }
    }

    /// HTTP status of the solver call itself.
    pub fn status(&self) -> StatusCode {
        match self {
            SolverReply::Envelope { status, .. } | SolverReply::Raw { status, .. } => *status,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            SolverReply::Envelope { envelope, .. } => Some(envelope),
            SolverReply::Raw { .. } => None,
        }
    }
}

/// Where the captured response body was found, if anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionBody {
    /// `response` was a plain string.
    Plain(String),
    /// `response` was an object; `body` is its `body` field.
    Structured {
        body: Option<Value>,
        headers: Option<Map<String, Value>>,
    },
    /// `response` held some other JSON value.
    Other(Value),
    /// No `response` at all.
    Absent,
}

impl SolutionBody {
    fn classify(response: Option<&Value>) -> Self {
        match response {
            None | Some(Value::Null) => SolutionBody::Absent,
            Some(Value::String(text)) => SolutionBody::Plain(text.clone()),
            Some(Value::Object(fields)) => SolutionBody::Structured {
                body: fields.get("body").cloned(),
                headers: fields.get("headers").and_then(Value::as_object).cloned(),
            },
            Some(other) => SolutionBody::Other(other.clone()),
        }
    }
}

/// A JSON reply from the solver, read permissively.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    raw: Value,
}

impl Envelope {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// The envelope's `status` field ("ok", "error", ...).
    pub fn status(&self) -> Option<&str> {
        self.raw.get("status").and_then(Value::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Some("ok")
    }

    /// Human readable detail the solver attaches to errors.
    pub fn message(&self) -> Option<&str> {
        self.raw.get("message").and_then(Value::as_str)
    }

    /// Session id returned by `sessions.create`.
    pub fn session(&self) -> Option<&str> {
        self.raw.get("session").and_then(Value::as_str)
    }

    /// Session ids returned by `sessions.list`. Non-string entries are skipped.
    pub fn sessions(&self) -> Vec<String> {
        self.raw
            .get("sessions")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn solution(&self) -> Option<&Map<String, Value>> {
        self.raw.get("solution").and_then(Value::as_object)
    }

    /// Locate the captured body.
    ///
    /// Reads `solution.response`; when `solution` is not an object the
    /// envelope's own top-level `response` is used instead.
    pub fn solution_body(&self) -> SolutionBody {
        match self.solution() {
            Some(solution) => SolutionBody::classify(solution.get("response")),
            None => SolutionBody::classify(self.raw.get("response")),
        }
    }

    /// First `content-type` header, matched case-insensitively, from
    /// `solution.headers` and then from the nested response object.
    pub fn content_type(&self) -> Option<String> {
        let solution_headers = self
            .solution()
            .and_then(|s| s.get("headers"))
            .and_then(Value::as_object);

        if let Some(found) = solution_headers.and_then(find_content_type) {
            return Some(found);
        }

        match self.solution_body() {
            SolutionBody::Structured { headers: Some(headers), .. } => find_content_type(&headers),
            _ => None,
        }
    }

    /// `solution.status`: the status the browser saw for the target page.
    pub fn upstream_status(&self) -> Option<u16> {
        self.solution()
            .and_then(|s| s.get("status"))
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }
}

fn find_content_type(headers: &Map<String, Value>) -> Option<String> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, value)| value.as_str())
        .map(str::to_owned)
}

//! Outbound command wire format.

use serde::Serialize;

use crate::solver::session::Session;

/// Commands understood by the solver service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandKind {
    #[serde(rename = "sessions.create")]
    SessionsCreate,
    #[serde(rename = "sessions.list")]
    SessionsList,
    #[serde(rename = "request.get")]
    RequestGet,
    #[serde(rename = "request.post")]
    RequestPost,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::SessionsCreate => "sessions.create",
            CommandKind::SessionsList => "sessions.list",
            CommandKind::RequestGet => "request.get",
            CommandKind::RequestPost => "request.post",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body forwarded with a `request.post` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub body: String,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A single command sent to the solver service.
///
/// Fields that are `None` are left out of the JSON entirely; the solver
/// treats a missing `session` as "use a throwaway browser context".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub cmd: CommandKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "maxTimeout", skip_serializing_if = "Option::is_none")]
    pub max_timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

impl Command {
    fn control(cmd: CommandKind) -> Self {
        Self {
            cmd,
            url: None,
            max_timeout: None,
            session: None,
            post_data: None,
        }
    }

    pub fn sessions_create() -> Self {
        Self::control(CommandKind::SessionsCreate)
    }

    pub fn sessions_list() -> Self {
        Self::control(CommandKind::SessionsList)
    }

    /// Fetch `url` in the browser.
    pub fn request_get(url: impl Into<String>, max_timeout_ms: u64, session: &Session) -> Self {
        Self {
            cmd: CommandKind::RequestGet,
            url: Some(url.into()),
            max_timeout: Some(max_timeout_ms),
            session: session.id().map(str::to_owned),
            post_data: None,
        }
    }

    /// Submit `post_data` to `url` in the browser.
    pub fn request_post(
        url: impl Into<String>,
        max_timeout_ms: u64,
        session: &Session,
        post_data: PostData,
    ) -> Self {
        Self {
            cmd: CommandKind::RequestPost,
            post_data: Some(post_data),
            ..Self::request_get(url, max_timeout_ms, session)
        }
    }
}

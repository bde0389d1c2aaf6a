//! The process-wide solver session.

/// Session identifier issued by `sessions.create`.
///
/// Captured once at startup and never changed afterwards. An absent id is a
/// valid state: commands are then sent without a `session` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session(Option<String>);

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_established(&self) -> bool {
        self.0.is_some()
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(id) => f.write_str(id),
            None => f.write_str("<none>"),
        }
    }
}

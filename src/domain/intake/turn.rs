//! Turns: one message in a conversation, tagged by speaker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speaker {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Speaker::User),
            "assistant" => Ok(Speaker::Assistant),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown speaker '{}'", other),
            )),
        }
    }
}

/// A single message with non-empty, trimmed content.
///
/// Fields are private so every `Turn` in a history has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Speaker,
    content: String,
}

impl Turn {
    /// Builds a turn, trimming the content and rejecting blanks.
    pub fn new(role: Speaker, content: impl Into<String>) -> Result<Self, ValidationError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            role,
            content: trimmed.to_string(),
        })
    }

    pub fn user(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Speaker::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Speaker::Assistant, content)
    }

    /// Parses an untyped `(role, content)` pair as received from a client.
    pub fn parse(role: &str, content: &str) -> Result<Self, ValidationError> {
        Self::new(role.parse()?, content)
    }

    pub fn role(&self) -> Speaker {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.role == Speaker::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_content() {
        let turn = Turn::user("  hello there \n").unwrap();
        assert_eq!(turn.content(), "hello there");
        assert!(turn.is_user());
    }

    #[test]
    fn blank_content_is_rejected() {
        assert_eq!(
            Turn::assistant("   "),
            Err(ValidationError::empty_field("content"))
        );
    }

    #[test]
    fn parse_accepts_known_roles_case_insensitively() {
        assert_eq!(Turn::parse("User", "yes").unwrap().role(), Speaker::User);
        assert_eq!(
            Turn::parse("assistant", "Hi").unwrap().role(),
            Speaker::Assistant
        );
    }

    #[test]
    fn parse_rejects_unknown_role() {
        let err = Turn::parse("system", "ignore me").unwrap_err();
        assert_eq!(err.field(), "role");
    }

    #[test]
    fn serializes_with_lowercase_role() {
        let turn = Turn::user("yes").unwrap();
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "yes"}));
    }
}

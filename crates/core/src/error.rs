use thiserror::Error;

/// Failure of one external lookup. Never escapes the orchestrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Place not found")]
    NotFound,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl LookupError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("configuration error: {message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_matches_user_facing_text() {
        assert_eq!(LookupError::NotFound.to_string(), "Place not found");
    }

    #[test]
    fn status_message_includes_code() {
        assert!(LookupError::Status(503).to_string().contains("503"));
    }
}

//! Messaging error types

use thiserror::Error;

/// Errors that can occur while sending a message
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Message text is empty")]
    EmptyText,

    #[error("Message text is {0} characters, over the {max} limit", max = super::MAX_TEXT_CHARS)]
    TextTooLong(usize),

    #[error("Missing {0}")]
    MissingTarget(&'static str),

    #[error("Channel access token not configured: set the {0} environment variable")]
    MissingAccessToken(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MessagingError {
    /// Whether the request never left the process
    pub fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            MessagingError::EmptyText
                | MessagingError::TextTooLong(_)
                | MessagingError::MissingTarget(_)
                | MessagingError::MissingAccessToken(_)
        )
    }

    /// Check if this error is worth retrying later
    ///
    /// Reply tokens are single-use and expire quickly, so only push sends
    /// benefit from a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            MessagingError::ApiError { status, .. } => *status == 429 || *status >= 500,
            MessagingError::Network(_) => true,
            _ => false,
        }
    }
}

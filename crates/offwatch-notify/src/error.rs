//! Error types for offwatch-notify

use thiserror::Error;

/// Errors that can occur while sending a report
#[derive(Error, Debug, Clone)]
pub enum NotifyError {
    /// Sender or recipient is not a valid mailbox
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// The rejected address
        address: String,
        /// Parser message
        reason: String,
    },

    /// The MIME message could not be assembled
    #[error("failed to build message: {0}")]
    Message(String),

    /// Relay connection, STARTTLS, login or transmission failed
    #[error("mail transport failed: {0}")]
    Transport(String),

    /// Relay rejected the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid relay configuration
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl NotifyError {
    /// Check if the message never reached the relay
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            NotifyError::InvalidAddress { .. } | NotifyError::Message(_) | NotifyError::ConfigError(_)
        )
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        // 535 and friends come back as permanent errors with an auth status code
        if err.is_permanent() && err.status().is_some_and(|code| code.to_string().starts_with("53"))
        {
            NotifyError::AuthenticationFailed(err.to_string())
        } else {
            NotifyError::Transport(err.to_string())
        }
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(err: lettre::error::Error) -> Self {
        NotifyError::Message(err.to_string())
    }
}

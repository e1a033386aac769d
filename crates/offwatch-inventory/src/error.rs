//! Error types for offwatch-inventory

use thiserror::Error;

/// Errors that can occur while reading the device inventory
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// Connection string or TLS settings were rejected
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Could not establish a session with the document store
    #[error("connection to the document store failed: {0}")]
    ConnectionFailed(String),

    /// Session was created but the liveness ping failed
    #[error("document store ping failed: {0}")]
    PingFailed(String),

    /// The filter query failed
    #[error("query execution failed: {0}")]
    QueryFailed(String),

    /// A returned document could not be decoded
    #[error("failed to decode device record: {0}")]
    Decode(String),

    /// No session is available (an earlier connect failed)
    #[error("not connected")]
    NotConnected,
}

impl InventoryError {
    /// Check if the error happened before any query was issued
    #[must_use]
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            InventoryError::ConfigError(_)
                | InventoryError::ConnectionFailed(_)
                | InventoryError::PingFailed(_)
                | InventoryError::NotConnected
        )
    }
}

impl From<mongodb::error::Error> for InventoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::InvalidArgument { .. } | ErrorKind::InvalidTlsConfig { .. } => {
                InventoryError::ConfigError(err.to_string())
            }
            ErrorKind::BsonDeserialization(_) => InventoryError::Decode(err.to_string()),
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. } => {
                InventoryError::ConnectionFailed(err.to_string())
            }
            _ => InventoryError::QueryFailed(err.to_string()),
        }
    }
}

//! Error types for offwatch-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before it starts
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// Settings file could not be read
    #[error("failed to read settings file {path:?}: {reason}")]
    Read {
        /// File path
        path: PathBuf,
        /// I/O error message
        reason: String,
    },

    /// Settings file is not valid TOML for this schema
    #[error("failed to parse settings file: {0}")]
    Parse(String),
}

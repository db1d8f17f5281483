//! Error types for mc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mc-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The current user's home directory could not be determined
    #[error("Unable to determine the home directory of the current user")]
    HomeDirUnavailable,

    /// No configuration file at the given path
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration file is malformed or carries fields illegal for its version
    #[error("Failed to parse configuration file {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Configuration version tag is not one this client can read or migrate
    #[error("Unsupported configuration version: {0}")]
    ConfigVersionUnsupported(String),

    /// Configuration could not be persisted
    #[error("Failed to write configuration file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Alias name fails the naming rule or collides with a command
    #[error("Invalid alias name: {0}")]
    InvalidAliasName(String),

    /// Endpoint URL is not a usable http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Unknown bucket ACL token
    #[error("Invalid bucket ACL: {0}")]
    InvalidAcl(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigParse { .. }
            | Error::ConfigVersionUnsupported(_)
            | Error::InvalidAliasName(_)
            | Error::InvalidUrl(_)
            | Error::InvalidAcl(_) => 2, // UsageError
            Error::ConfigNotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            _ => 1,                                                  // GeneralError
        }
    }
}

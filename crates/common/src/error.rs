//! Common error types.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the browser shell.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on `{}`: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing asset: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl BrowserError {
    /// Wrap an IO error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn missing_asset(path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset(path.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error means the underlying file does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io(error) | Self::File { source: error, .. } => {
                error.kind() == std::io::ErrorKind::NotFound
            }
            Self::MissingAsset(_) => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}

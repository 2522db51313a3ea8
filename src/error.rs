//! Error handling for ckedit

use thiserror::Error;

/// Main error type for ckedit operations
#[derive(Error, Debug)]
pub enum CkeditError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cookie store error: {0}")]
    Store(String),

    #[error("No cookies cached for domain: {0}")]
    UnknownDomain(String),

    #[error("Session is already listening for cookie changes")]
    AlreadyListening,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Result type alias for ckedit operations
pub type Result<T> = std::result::Result<T, CkeditError>;

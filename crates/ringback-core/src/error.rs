//! Error types shared by every Ringback crate.

use thiserror::Error;

/// Errors raised by platform collaborators and configuration.
#[derive(Debug, Error)]
pub enum RingbackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Contacts error: {0}")]
    Contacts(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RingbackError>;

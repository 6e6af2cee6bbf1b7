//! Error types for the alert job and its collaborators

use thiserror::Error;

/// Errors from a device-state store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Data format error: {message}")]
    FormatError { message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("Service unavailable")]
    ServiceUnavailable,
}

/// Errors from an event publisher
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Event rejected: {message}")]
    Rejected { message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },
}

/// Errors that end a single job run
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Ledger read failed: {0}")]
    Store(#[from] StoreError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("Payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl StoreError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError { message: message.into() }
    }
}

impl PublishError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into() }
    }
}

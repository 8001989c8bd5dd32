//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response, or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server responded {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            ClientError::InvalidResponse(_) => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

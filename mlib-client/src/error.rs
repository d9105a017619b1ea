//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or undecodable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Reading the file to upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Form rejected before sending
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

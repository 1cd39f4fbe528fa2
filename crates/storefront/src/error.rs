//! Client error types.

use domain::{CatalogError, SubmissionError};
use thiserror::Error;

/// Errors from talking to the MediShop API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("Client setup failed: {0}")]
    Setup(String),

    /// The request never got a response (connection refused, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Response(String),

    /// The server answered with a failure. `message` is the server's own
    /// wording.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl From<ClientError> for CatalogError {
    fn from(err: ClientError) -> Self {
        CatalogError::Unavailable(err.to_string())
    }
}

impl From<ClientError> for SubmissionError {
    fn from(err: ClientError) -> Self {
        SubmissionError::Failed(err.to_string())
    }
}

//! Error types for the ingestor.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for ingestor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestor errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A block record violates the parser contract
    #[error("Invalid block {block_idx}: {message}")]
    InvalidBlock { block_idx: usize, message: String },

    /// A request body or query could not be decoded
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Abbreviation rule compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid block error
    pub fn invalid_block(block_idx: usize, message: impl Into<String>) -> Self {
        Self::InvalidBlock {
            block_idx,
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidBlock { .. } | Error::BadRequest(_) | Error::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Config(_) | Error::Regex(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": "fail",
            "reason": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_block_is_client_error() {
        let err = Error::invalid_block(3, "header without level");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid block 3: header without level");
    }

    #[test]
    fn test_internal_is_server_error() {
        let response = Error::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

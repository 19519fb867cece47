use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message the account service uses for failures it cannot explain.
///
/// Clients key their "handled locally" behavior off this exact text.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No route matched the request.
    NotFound,
    /// The request body could not be read as the expected payload.
    Validation,
    Internal,
}

/// Error body returned by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn is_unexpected(&self) -> bool {
        self.message == UNEXPECTED_ERROR_MESSAGE
    }
}

/// Failure raised inside the account service before it is written out as an
/// [`ApiError`] body.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Internal failure reported with the reserved unexpected-error message.
    pub fn unexpected() -> Self {
        Self::new(ErrorCode::Internal, UNEXPECTED_ERROR_MESSAGE)
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

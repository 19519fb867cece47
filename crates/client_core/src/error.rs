use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// Why an account fetch did not produce a new snapshot.
///
/// `Unexpected` is the one kind the refresh controller absorbs; every other
/// variant is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Unexpected error")]
    Unexpected,
    #[error("{message}")]
    Rejected { code: ErrorCode, message: String },
    #[error("account service responded with status {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("invalid account payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn from_api_error(err: ApiError) -> Self {
        if err.is_unexpected() {
            Self::Unexpected
        } else {
            Self::Rejected {
                code: err.code,
                message: err.message,
            }
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

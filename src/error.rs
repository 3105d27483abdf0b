//! Error types for the stock lookup request cycle.

use thiserror::Error;

/// Message shown when a search fails for any reason other than a
/// server-reported error.
pub const FALLBACK_ERROR: &str = "Error : No record has been found, please enter a valid symbol.";

/// Failure of a single `/api/stock/{symbol}` request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend answered with a non-2xx status and a JSON `error` string.
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error text supplied by the backend
        message: String,
    },

    /// The request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The body could not be decoded as the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-2xx status without a usable `error` field.
    #[error("unexpected status {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },
}

impl FetchError {
    /// Text to put in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server { message, .. } => message.clone(),
            _ => FALLBACK_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

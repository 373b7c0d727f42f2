//! Authentication error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] souk_core::EmailError),

    /// Invalid credentials (login rejected by the accounts API).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No refresh token is stored; refresh is impossible.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// Token refresh failed; the session was forcibly terminated.
    #[error("session expired")]
    SessionExpired,

    /// The accounts API rejected the request.
    #[error("accounts API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: StatusCode,
        /// Truncated response body.
        message: String,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local store write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order submission failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server-side fault worth tracking.
    fn is_server_fault(&self) -> bool {
        match self {
            Self::Store(_) | Self::Internal(_) => true,
            Self::Catalog(e) => !matches!(e, CatalogError::NotFound(_)),
            Self::Order(e) => matches!(e, OrderError::Store(_)),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::MissingRefreshToken
                | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                // Pass client-class API statuses through; everything else is
                // an upstream fault.
                AuthError::Api { status, .. } if status.is_client_error() => *status,
                AuthError::Api { .. } | AuthError::Http(_) | AuthError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::Empty => StatusCode::BAD_REQUEST,
                OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                OrderError::Auth(AuthError::SessionExpired | AuthError::MissingRefreshToken) => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => "Not found".to_string(),
                _ => "Catalog service error".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::MissingRefreshToken | AuthError::SessionExpired => {
                    "Session expired".to_string()
                }
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Api { message, .. } => message.clone(),
                _ => "Authentication error".to_string(),
            },
            Self::Order(err) => match err {
                OrderError::Empty => "No items to order".to_string(),
                OrderError::Auth(_) => "Session expired".to_string(),
                _ => "Order submission failed".to_string(),
            },
            // Messages carried by these variants are already user-facing.
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Authentication service errors
//!
//! Expected outcomes (bad credentials, unknown session) are values, not
//! errors. `AuthError` is reserved for the store being unreachable and for
//! genuine internal failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use thiserror::Error;

use crate::jwt::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// User store or session store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A session token could not be signed
    #[error("failed to sign session token: {0}")]
    Signing(#[source] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the caller may retry with backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Store(e) if e.is_transient())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = if self.is_transient() {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
            )
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

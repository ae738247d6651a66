//! Error types for web handlers.
//!
//! This module bridges between the domain error taxonomy and HTTP
//! responses, implementing Axum's `IntoResponse` trait. One rule is
//! load-bearing for the UI: "already registered" is never routed
//! through here — it is a success body, not an error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use campus_events_auth::TokenError;
use campus_events_core::Error;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach a source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            message.into(),
            "CONFLICT".to_string(),
        )
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { reason } => Self::validation(reason),
            Error::DuplicateEmail => Self::conflict("email already registered"),
            Error::InvalidCredentials => Self::unauthorized("invalid credentials"),
            Error::Forbidden { required } => {
                Self::forbidden(format!("insufficient permissions: {required}"))
            }
            Error::NotFound { resource } => Self::not_found(resource),
            Error::Unavailable { reason } => {
                Self::unavailable("storage unavailable, retry later")
                    .with_source(anyhow::anyhow!(reason))
            }
            Error::Internal => Self::internal("internal error"),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::unauthorized("token has expired"),
            TokenError::Malformed => Self::unauthorized("token is malformed"),
            TokenError::Revoked => Self::unauthorized("token has been revoked"),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = AppError::validation("Invalid input");
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] Invalid input");
    }

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases = [
            (Error::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::DuplicateEmail, StatusCode::CONFLICT),
            (Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (Error::forbidden("admin role"), StatusCode::FORBIDDEN),
            (
                Error::NotFound { resource: "event" },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::Unavailable {
                    reason: "timeout".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (domain, status) in cases {
            let app: AppError = domain.into();
            assert_eq!(app.status, status);
        }
    }

    #[test]
    fn token_errors_are_unauthorized() {
        for token_err in [TokenError::Expired, TokenError::Malformed, TokenError::Revoked] {
            let app: AppError = token_err.into();
            assert_eq!(app.status, StatusCode::UNAUTHORIZED);
        }
    }
}

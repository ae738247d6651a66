//! Error taxonomy shared by all stores and services.

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the identity and registration service.
///
/// The variants map one-to-one onto the HTTP statuses the web layer
/// returns, so handlers never need to pattern-match on message strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or out-of-range input (empty title, unknown category, ...).
    #[error("validation failed: {reason}")]
    Validation {
        /// What was wrong with the input.
        reason: String,
    },

    /// An identity with this email already exists (case-insensitive).
    #[error("email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password.
    ///
    /// Deliberately a single variant: callers must not be able to
    /// distinguish "no such account" from "wrong password".
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The caller's role does not permit this operation.
    #[error("insufficient permissions: {required}")]
    Forbidden {
        /// Role or capability that was required.
        required: String,
    },

    /// The referenced record does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Kind of record that was looked up.
        resource: &'static str,
    },

    /// Storage failure or timeout; the operation is safe to retry.
    #[error("storage unavailable: {reason}")]
    Unavailable {
        /// Underlying cause, for logs.
        reason: String,
    },

    /// Invariant violation inside the service itself.
    #[error("internal error")]
    Internal,
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing-role failure.
    pub fn forbidden(required: impl Into<String>) -> Self {
        Self::Forbidden {
            required: required.into(),
        }
    }
}

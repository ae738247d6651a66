//! Credential store trait.

use campus_events_core::{Identity, Result, UserId};
use std::future::Future;

/// Storage seam for identity records.
///
/// Implementations own email uniqueness: `create_identity` must compare
/// emails case-insensitively and reject duplicates atomically with the
/// insert, so two concurrent sign-ups cannot both succeed.
pub trait CredentialStore: Send + Sync {
    /// Insert a new identity.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Storage fails
    /// - Email already exists (case-insensitive) → `Error::DuplicateEmail`
    fn create_identity(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Identity>> + Send;

    /// Get an identity by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Storage fails
    /// - Identity not found → `Error::NotFound`
    fn get_identity(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Identity>> + Send;

    /// Look up an identity by email (case-insensitive).
    ///
    /// Returns `None` for unknown emails; authentication turns that into
    /// the same error as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Identity>>> + Send;

    /// Replace a stored identity.
    ///
    /// Used by profile merging only; role, email, and credentials are
    /// not changed through this path.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Storage fails
    /// - Identity not found → `Error::NotFound`
    fn update_identity(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Identity>> + Send;
}

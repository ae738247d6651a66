//! Account creation, authentication, and profile merging.

use crate::password;
use crate::store::CredentialStore;
use campus_events_core::validate::validate_email;
use campus_events_core::{Error, Identity, ProfilePatch, Result, Role, UserId};
use chrono::Utc;
use std::sync::Arc;

/// Identity operations over a [`CredentialStore`].
///
/// This is the profile merge service of the platform as well: profile
/// patches are role-gated here, before any write reaches the store.
#[derive(Debug, Clone)]
pub struct CredentialService<C> {
    store: Arc<C>,
}

impl<C: CredentialStore> CredentialService<C> {
    /// Create a service over a store.
    pub const fn new(store: Arc<C>) -> Self {
        Self { store }
    }

    /// Create a new identity.
    ///
    /// The password is hashed on a blocking thread before the record is
    /// stored; the plaintext is dropped here and never logged.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` on malformed email or empty name/password
    /// - `Error::DuplicateEmail` if the email is taken (case-insensitive)
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity> {
        validate_email(email)?;
        if name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("password must not be empty"));
        }

        let password_hash = password::hash_blocking(password.to_string()).await?;
        let identity = Identity {
            id: UserId::new(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            role,
            student_details: None,
            college_details: None,
            created_at: Utc::now(),
        };

        let created = self.store.create_identity(&identity).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "identity created");
        Ok(created)
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password produce the identical error, and
    /// the unknown-email path still burns a hash verification so timing
    /// does not reveal which case occurred.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCredentials` on any mismatch.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let Some(identity) = self.store.find_by_email(email).await? else {
            password::verify_dummy_blocking(password.to_string()).await;
            return Err(Error::InvalidCredentials);
        };

        let ok = password::verify_blocking(
            identity.password_hash.clone(),
            password.to_string(),
        )
        .await?;
        if !ok {
            return Err(Error::InvalidCredentials);
        }

        tracing::info!(user_id = %identity.id, "authenticated");
        Ok(identity)
    }

    /// Get an identity by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown ids.
    pub async fn get(&self, user_id: UserId) -> Result<Identity> {
        self.store.get_identity(user_id).await
    }

    /// Merge a role-appropriate patch into an identity's profile
    /// sub-document.
    ///
    /// Students may only patch `studentDetails`, hosts only
    /// `collegeDetails`; a cross-role patch fails before any write.
    /// Fields absent from the patch keep their prior values. Role,
    /// credentials, and registrations are never touched here.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` for unknown ids
    /// - `Error::Forbidden` on a cross-role patch
    pub async fn update_profile(
        &self,
        user_id: UserId,
        patch: ProfilePatch,
    ) -> Result<Identity> {
        let mut identity = self.store.get_identity(user_id).await?;

        match (&patch, identity.role) {
            (ProfilePatch::Student(_), Role::Student)
            | (ProfilePatch::College(_), Role::Admin) => {}
            (ProfilePatch::Student(_), Role::Admin) => {
                return Err(Error::forbidden("student role"));
            }
            (ProfilePatch::College(_), Role::Student) => {
                return Err(Error::forbidden("admin role"));
            }
        }

        identity.apply_patch(patch);
        self.store.update_identity(&identity).await
    }
}

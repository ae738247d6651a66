//! In-memory credential store.
//!
//! The default store for a single-process deployment and for tests.
//! One mutex guards both indexes, so the duplicate-email check and the
//! insert are a single atomic step.

use crate::store::CredentialStore;
use campus_events_core::validate::normalize_email;
use campus_events_core::{Error, Identity, Result, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    identities: HashMap<UserId, Identity>,
    by_email: HashMap<String, UserId>,
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn create_identity(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Identity>> + Send {
        let inner = Arc::clone(&self.inner);
        let identity = identity.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| Error::Internal)?;
            let key = normalize_email(&identity.email);
            if guard.by_email.contains_key(&key) {
                return Err(Error::DuplicateEmail);
            }
            guard.by_email.insert(key, identity.id);
            guard.identities.insert(identity.id, identity.clone());
            Ok(identity)
        }
    }

    fn get_identity(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Identity>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            inner
                .lock()
                .map_err(|_| Error::Internal)?
                .identities
                .get(&user_id)
                .cloned()
                .ok_or(Error::NotFound { resource: "identity" })
        }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Identity>>> + Send {
        let inner = Arc::clone(&self.inner);
        let key = normalize_email(email);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            Ok(guard
                .by_email
                .get(&key)
                .and_then(|id| guard.identities.get(id))
                .cloned())
        }
    }

    fn update_identity(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Identity>> + Send {
        let inner = Arc::clone(&self.inner);
        let identity = identity.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| Error::Internal)?;
            if !guard.identities.contains_key(&identity.id) {
                return Err(Error::NotFound { resource: "identity" });
            }
            guard.identities.insert(identity.id, identity.clone());
            Ok(identity)
        }
    }
}

//! Application state shared across handlers.

use campus_events_auth::{CredentialService, CredentialStore, InMemoryCredentialStore, TokenService};
use campus_events_registry::{EventStore, InMemoryRegistry, RegistrationEngine, RegistrationStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Generic over the credential store `C` and the event/registration
/// store `S`, so tests and the in-memory deployment use the same
/// handlers as a PostgreSQL-backed one.
#[derive(Clone)]
pub struct AppState<C, S> {
    /// Identity operations (accounts, authentication, profile merge).
    pub credentials: CredentialService<C>,
    /// Event lifecycle and registration.
    pub engine: RegistrationEngine<S>,
    /// Direct read access to the event/registration store.
    pub registry: Arc<S>,
    /// Session token issue/verify.
    pub tokens: TokenService,
}

impl<C: CredentialStore, S: EventStore + RegistrationStore> AppState<C, S> {
    /// Assemble state from its parts.
    pub fn new(credentials: Arc<C>, registry: Arc<S>, tokens: TokenService) -> Self {
        Self {
            credentials: CredentialService::new(credentials),
            engine: RegistrationEngine::new(Arc::clone(&registry)),
            registry,
            tokens,
        }
    }
}

impl AppState<InMemoryCredentialStore, InMemoryRegistry> {
    /// State over fresh in-memory stores; the default for a
    /// single-process deployment and for tests.
    #[must_use]
    pub fn in_memory(tokens: TokenService) -> Self {
        Self::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryRegistry::new()),
            tokens,
        )
    }
}

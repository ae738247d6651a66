//! Credentials and session tokens for the campus events platform.
//!
//! This crate owns everything identity-shaped:
//!
//! - [`CredentialStore`]: the storage seam for identity records, with an
//!   in-memory implementation (and a PostgreSQL one behind the
//!   `postgres` feature).
//! - [`CredentialService`]: account creation, authentication, and
//!   role-gated profile merging on top of the store.
//! - [`TokenService`]: stateless issue/verify of signed session tokens
//!   carrying the identity id and role claim.
//! - [`password`]: salted argon2 hashing, offloaded to blocking threads
//!   so it never stalls the request scheduler.
//!
//! Verification of a token requires no database round-trip; every
//! request trusts only the verified claim, never client-cached data.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod memory;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryCredentialStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCredentialStore;
pub use service::CredentialService;
pub use store::CredentialStore;
pub use token::{AuthClaims, TokenError, TokenService};

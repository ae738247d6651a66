//! Event store and registration engine.
//!
//! Events and registrations share one storage seam. The registration
//! table is the single source of truth for the student/event
//! relationship: the event's attendee list and the student's
//! registered-events list are both views derived from it, so there is
//! no dual write to tear and no way for the two to disagree.
//!
//! The hard invariant lives in [`store::RegistrationStore::insert_registration`]:
//! the duplicate check and the append are one linearizable insert on the
//! `(event, student)` key. In memory that is a single mutex-guarded map
//! insert; in PostgreSQL it is a primary-key constraint with
//! `ON CONFLICT DO NOTHING`.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod memory;
pub mod store;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use engine::{RegistrationEngine, RegistrationOutcome, RegistrationReceipt};
pub use memory::InMemoryRegistry;
#[cfg(feature = "postgres")]
pub use postgres::PostgresRegistry;
pub use store::{EventStore, RegistrationStore};

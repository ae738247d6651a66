//! Domain types for the campus events platform.
//!
//! This crate defines the shared vocabulary of the system: identities
//! (students and admin hosts), events, registrations, and the error
//! taxonomy every store and service speaks.
//!
//! # Architecture
//!
//! The crate is deliberately free of I/O: stores and services in the
//! `campus-events-auth` and `campus-events-registry` crates operate on
//! these types behind trait seams, so business rules can be tested at
//! memory speed.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod identity;
pub mod ids;
pub mod validate;

pub use error::{Error, Result};
pub use event::{Category, Event, NewEvent, Registration};
pub use identity::{
    CollegeDetails, CollegeDetailsPatch, Identity, ProfilePatch, Role, StudentDetails,
    StudentDetailsPatch,
};
pub use ids::{EventId, UserId};

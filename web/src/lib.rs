//! HTTP surface of the campus events platform.
//!
//! Exposes account registration and login, event creation and
//! discovery, student registration, and profile management as a JSON
//! API over Axum. Handlers are generic over the storage traits, so the
//! in-memory stores used in tests exercise exactly the code a
//! PostgreSQL deployment runs.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use extractors::{AuthUser, BearerToken};
pub use middleware::CorrelationIdLayer;
pub use router::build_router;
pub use state::AppState;

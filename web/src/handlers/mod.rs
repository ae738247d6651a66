//! HTTP request handlers.

pub mod auth;
pub mod events;
pub mod health;
pub mod profile;

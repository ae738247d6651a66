//! Identifier newtypes.
//!
//! All records are keyed by UUIDs wrapped in dedicated types so a user id
//! can never be passed where an event id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an identity (student or admin host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a `UserId` from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the string is not a valid UUID.
    pub fn parse(s: &str) -> crate::Result<Self> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::Error::Validation {
                reason: format!("invalid user id: {s}"),
            })
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    /// Generate a new random `EventId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse an `EventId` from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the string is not a valid UUID.
    pub fn parse(s: &str) -> crate::Result<Self> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::Error::Validation {
                reason: format!("invalid event id: {s}"),
            })
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_round_trips_through_display() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string());
        assert_eq!(parsed, Ok(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EventId::parse("not-a-uuid").is_err());
    }
}

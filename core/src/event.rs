//! Event and registration records.

use crate::ids::{EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Technical events (hackathons, coding contests, ...).
    Technical,
    /// Cultural events.
    Cultural,
    /// Sports events.
    Sports,
    /// Workshops.
    Workshop,
    /// Anything else.
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Technical => "Technical",
            Self::Cultural => "Cultural",
            Self::Sports => "Sports",
            Self::Workshop => "Workshop",
            Self::Other => "Other",
        };
        f.write_str(tag)
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "Technical" => Ok(Self::Technical),
            "Cultural" => Ok(Self::Cultural),
            "Sports" => Ok(Self::Sports),
            "Workshop" => Ok(Self::Workshop),
            "Other" => Ok(Self::Other),
            other => Err(crate::Error::Validation {
                reason: format!("unknown category: {other}"),
            }),
        }
    }
}

/// Input fields for creating an event.
///
/// The owning host and the generated id are supplied by the event store,
/// not the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Start timestamp.
    pub date: DateTime<Utc>,
    /// Venue or location string.
    pub location: String,
    /// Category from the closed set.
    pub category: Category,
    /// Registration fee; zero means free. Non-negative by construction.
    #[serde(default)]
    pub fee: u32,
    /// Opaque brochure path returned by the upload service, if any.
    #[serde(default)]
    pub brochure: Option<String>,
}

/// A hosted activity open for registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Start timestamp.
    pub date: DateTime<Utc>,
    /// Venue or location string.
    pub location: String,
    /// Category from the closed set.
    pub category: Category,
    /// Registration fee; zero means free.
    pub fee: u32,
    /// Opaque brochure path, if any.
    pub brochure: Option<String>,
    /// Owning host identity (always an admin).
    pub host: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The record of one student enrolling in one event.
///
/// At most one exists per `(event, student)` pair; the registration
/// store enforces this at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// The event registered for.
    pub event_id: EventId,
    /// The registering student.
    pub student_id: UserId,
    /// When the registration was created.
    pub registered_at: DateTime<Utc>,
    /// Free-text teammate names; empty for solo registrations.
    pub teammates: Vec<String>,
}

//! The registration engine.

use crate::store::{EventStore, RegistrationStore};
use campus_events_core::validate::{clean_teammates, validate_new_event};
use campus_events_core::{
    Error, Event, EventId, NewEvent, Registration, Result, Role, UserId,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// What happened to a registration attempt.
///
/// `AlreadyRegistered` is informational success, not a failure: the UI
/// shows "you are already registered" rather than an error, so the
/// distinction must survive all the way to the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RegistrationOutcome {
    /// A new registration was created.
    Created {
        /// The created registration.
        registration: Registration,
    },
    /// A registration for this `(event, student)` pair already existed.
    AlreadyRegistered {
        /// The pre-existing registration.
        registration: Registration,
    },
}

impl RegistrationOutcome {
    /// `true` for the freshly-created case.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// A registration outcome plus the event's current attendee count, for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    /// Outcome of the attempt.
    #[serde(flatten)]
    pub outcome: RegistrationOutcome,
    /// Attendee count after the attempt.
    pub attendee_count: usize,
}

/// Event lifecycle and registration over a shared store.
///
/// All mutation of events and registrations goes through here; no
/// component touches the store records directly.
#[derive(Debug, Clone)]
pub struct RegistrationEngine<S> {
    store: Arc<S>,
}

impl<S: EventStore + RegistrationStore> RegistrationEngine<S> {
    /// Create an engine over a store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an event owned by `host`.
    ///
    /// Fails fast, before any write: the host must hold the admin role
    /// and the fields must validate.
    ///
    /// # Errors
    ///
    /// - `Error::Forbidden` if `host_role` is not admin
    /// - `Error::Validation` on empty title/location
    pub async fn create_event(
        &self,
        host: UserId,
        host_role: Role,
        input: NewEvent,
    ) -> Result<Event> {
        if host_role != Role::Admin {
            return Err(Error::forbidden("admin role"));
        }
        validate_new_event(&input)?;

        let event = Event {
            id: EventId::new(),
            title: input.title.trim().to_string(),
            description: input.description,
            date: input.date,
            location: input.location.trim().to_string(),
            category: input.category,
            fee: input.fee,
            brochure: input.brochure,
            host,
            created_at: Utc::now(),
        };

        let created = self.store.insert_event(&event).await?;
        metrics::counter!("campus_events_created_total").increment(1);
        tracing::info!(event_id = %created.id, host = %host, "event created");
        Ok(created)
    }

    /// Register `student` for an event.
    ///
    /// Teammate names are trimmed and empty entries dropped before the
    /// registration is stored. The insert is idempotent: a repeat
    /// attempt (or a retry after a timeout) yields
    /// [`RegistrationOutcome::AlreadyRegistered`] with the original
    /// registration, never a duplicate.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` for an unknown event
    /// - `Error::Forbidden` if `student_role` is not student
    pub async fn register(
        &self,
        event_id: EventId,
        student: UserId,
        student_role: Role,
        teammates: Vec<String>,
    ) -> Result<RegistrationReceipt> {
        if student_role != Role::Student {
            return Err(Error::forbidden("student role"));
        }

        let event = self.store.get_event(event_id).await?;

        let registration = Registration {
            event_id: event.id,
            student_id: student,
            registered_at: Utc::now(),
            teammates: clean_teammates(teammates),
        };

        let outcome = self.store.insert_registration(&registration).await?;
        if outcome.is_created() {
            metrics::counter!("campus_registrations_created_total").increment(1);
            tracing::info!(event_id = %event.id, student = %student, "registration created");
        } else {
            tracing::debug!(event_id = %event.id, student = %student, "already registered");
        }

        let attendee_count = self.store.attendee_count(event.id).await?;
        Ok(RegistrationReceipt {
            outcome,
            attendee_count,
        })
    }

    /// An event plus its current attendee count.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown event.
    pub async fn event_with_count(&self, event_id: EventId) -> Result<(Event, usize)> {
        let event = self.store.get_event(event_id).await?;
        let count = self.store.attendee_count(event_id).await?;
        Ok((event, count))
    }

    /// The events a student has registered for, expanded to full
    /// records, in registration order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn registered_events(&self, student: UserId) -> Result<Vec<Event>> {
        let ids = self.store.events_for_student(student).await?;
        let mut events = Vec::with_capacity(ids.len());
        for id in ids {
            // A registration always references a live event; events are
            // never deleted in this contract.
            events.push(self.store.get_event(id).await?);
        }
        Ok(events)
    }
}

//! Storage traits for events and registrations.

use crate::engine::RegistrationOutcome;
use campus_events_core::{Event, EventId, Registration, Result, UserId};
use std::future::Future;

/// Storage seam for event records.
pub trait EventStore: Send + Sync {
    /// Insert a new event.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn insert_event(&self, event: &Event) -> impl Future<Output = Result<Event>> + Send;

    /// Get an event by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Storage fails
    /// - Event not found → `Error::NotFound`
    fn get_event(&self, event_id: EventId) -> impl Future<Output = Result<Event>> + Send;

    /// All events, ascending by start timestamp, insertion order on ties.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Events owned by one host, same ordering as [`Self::list_events`].
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn list_events_by_host(
        &self,
        host: UserId,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;
}

/// Storage seam for the registration table.
///
/// The table is keyed by `(event, student)`; both the per-event attendee
/// view and the per-student registered-events view derive from it.
pub trait RegistrationStore: Send + Sync {
    /// Insert a registration unless one already exists for its
    /// `(event, student)` key.
    ///
    /// This is the serialization point of the whole engine: the
    /// duplicate check and the append must be one atomic step, so two
    /// concurrent attempts for the same pair can never both insert.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails. An existing registration is NOT
    /// an error; it comes back as
    /// [`RegistrationOutcome::AlreadyRegistered`].
    fn insert_registration(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<RegistrationOutcome>> + Send;

    /// Registrations for one event, in registration order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<Registration>>> + Send;

    /// Ids of the events one student has registered for, in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn events_for_student(
        &self,
        student: UserId,
    ) -> impl Future<Output = Result<Vec<EventId>>> + Send;

    /// Number of registrations on one event.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn attendee_count(&self, event_id: EventId) -> impl Future<Output = Result<usize>> + Send;
}

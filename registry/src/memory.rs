//! In-memory event and registration store.
//!
//! One mutex guards events and the registration table together, so the
//! duplicate check and the append in `insert_registration` are a single
//! atomic step and a concurrent reader can never observe a half-applied
//! registration.

use crate::engine::RegistrationOutcome;
use crate::store::{EventStore, RegistrationStore};
use campus_events_core::{Error, Event, EventId, Registration, Result, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    /// Events plus their insertion sequence, for stable tie-breaking.
    events: HashMap<EventId, (Event, u64)>,
    next_seq: u64,
    /// Single source of truth for the student/event relationship.
    registrations: HashMap<(EventId, UserId), Registration>,
    /// Registration order of the keys above, for ordered views.
    registration_order: Vec<(EventId, UserId)>,
}

/// In-memory event and registration store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRegistry {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryRegistry {
    fn insert_event(&self, event: &Event) -> impl Future<Output = Result<Event>> + Send {
        let inner = Arc::clone(&self.inner);
        let event = event.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| Error::Internal)?;
            let seq = guard.next_seq;
            guard.next_seq += 1;
            guard.events.insert(event.id, (event.clone(), seq));
            Ok(event)
        }
    }

    fn get_event(&self, event_id: EventId) -> impl Future<Output = Result<Event>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            inner
                .lock()
                .map_err(|_| Error::Internal)?
                .events
                .get(&event_id)
                .map(|(event, _)| event.clone())
                .ok_or(Error::NotFound { resource: "event" })
        }
    }

    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            let mut rows: Vec<&(Event, u64)> = guard.events.values().collect();
            rows.sort_by_key(|(event, seq)| (event.date, *seq));
            Ok(rows.into_iter().map(|(event, _)| event.clone()).collect())
        }
    }

    fn list_events_by_host(
        &self,
        host: UserId,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            let mut rows: Vec<&(Event, u64)> = guard
                .events
                .values()
                .filter(|(event, _)| event.host == host)
                .collect();
            rows.sort_by_key(|(event, seq)| (event.date, *seq));
            Ok(rows.into_iter().map(|(event, _)| event.clone()).collect())
        }
    }
}

impl RegistrationStore for InMemoryRegistry {
    fn insert_registration(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<RegistrationOutcome>> + Send {
        let inner = Arc::clone(&self.inner);
        let registration = registration.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| Error::Internal)?;
            let key = (registration.event_id, registration.student_id);

            if let Some(existing) = guard.registrations.get(&key) {
                return Ok(RegistrationOutcome::AlreadyRegistered {
                    registration: existing.clone(),
                });
            }

            guard.registrations.insert(key, registration.clone());
            guard.registration_order.push(key);
            Ok(RegistrationOutcome::Created { registration })
        }
    }

    fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<Registration>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            Ok(guard
                .registration_order
                .iter()
                .filter(|(event, _)| *event == event_id)
                .filter_map(|key| guard.registrations.get(key))
                .cloned()
                .collect())
        }
    }

    fn events_for_student(
        &self,
        student: UserId,
    ) -> impl Future<Output = Result<Vec<EventId>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            Ok(guard
                .registration_order
                .iter()
                .filter(|(_, s)| *s == student)
                .map(|(event, _)| *event)
                .collect())
        }
    }

    fn attendee_count(&self, event_id: EventId) -> impl Future<Output = Result<usize>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| Error::Internal)?;
            Ok(guard
                .registrations
                .keys()
                .filter(|(event, _)| *event == event_id)
                .count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_events_core::Category;
    use chrono::{Duration, Utc};

    fn event(host: UserId, offset_hours: i64) -> Event {
        Event {
            id: EventId::new(),
            title: "Hackathon".to_string(),
            description: String::new(),
            date: Utc::now() + Duration::hours(offset_hours),
            location: "Main Hall".to_string(),
            category: Category::Technical,
            fee: 0,
            brochure: None,
            host,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn events_list_ascending_by_start_time() {
        let store = InMemoryRegistry::new();
        let host = UserId::new();
        let late = event(host, 48);
        let early = event(host, 1);

        let _ = store.insert_event(&late).await;
        let _ = store.insert_event(&early).await;

        let listed = store.list_events().await.unwrap_or_default();
        let ids: Vec<EventId> = listed.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[tokio::test]
    async fn host_listing_excludes_other_hosts() {
        let store = InMemoryRegistry::new();
        let host_a = UserId::new();
        let host_b = UserId::new();

        let _ = store.insert_event(&event(host_a, 1)).await;
        let _ = store.insert_event(&event(host_b, 2)).await;

        let listed = store.list_events_by_host(host_a).await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|e| e.host == host_a));
    }

    #[tokio::test]
    async fn second_insert_for_same_pair_returns_existing() {
        let store = InMemoryRegistry::new();
        let host = UserId::new();
        let student = UserId::new();
        let hackathon = event(host, 1);
        let _ = store.insert_event(&hackathon).await;

        let first = Registration {
            event_id: hackathon.id,
            student_id: student,
            registered_at: Utc::now(),
            teammates: vec!["Bob".to_string()],
        };
        let second = Registration {
            teammates: vec!["Carol".to_string()],
            ..first.clone()
        };

        let outcome_one = store.insert_registration(&first).await;
        let outcome_two = store.insert_registration(&second).await;

        assert_eq!(
            outcome_one,
            Ok(RegistrationOutcome::Created {
                registration: first.clone()
            })
        );
        // The original registration wins; the retry's teammates are ignored.
        assert_eq!(
            outcome_two,
            Ok(RegistrationOutcome::AlreadyRegistered {
                registration: first
            })
        );
        assert_eq!(store.attendee_count(hackathon.id).await, Ok(1));
    }
}

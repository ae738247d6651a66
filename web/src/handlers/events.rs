//! Event endpoints.
//!
//! - `GET /api/events` - discovery feed, start-time ascending (public)
//! - `GET /api/events/myevents?hostId=` - host dashboard (admin, own events)
//! - `POST /api/events` - create an event (admin)
//! - `GET /api/events/:id` - single event with attendee count (public)
//! - `POST /api/events/:id/register` - register the calling student
//! - `GET /api/events/:id/registrations` - attendee list for the host

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_events_auth::CredentialStore;
use campus_events_core::{Event, EventId, NewEvent, Registration, UserId};
use campus_events_registry::{
    EventStore, RegistrationReceipt, RegistrationStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event plus its current attendee count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// The event record.
    #[serde(flatten)]
    pub event: Event,
    /// Number of registrations on the event.
    pub attendee_count: usize,
}

/// Query parameters for the host-scoped listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEventsQuery {
    /// Host whose events to list; must be the calling admin.
    pub host_id: UserId,
}

/// Body of a registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForEventRequest {
    /// Free-text teammate names; trimmed server-side, empties dropped.
    #[serde(default)]
    pub teammates: Vec<String>,
    /// Optional echo of the caller's id; must match the token if given.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Outcome of a registration attempt, with a display message.
///
/// The `status` field distinguishes a fresh registration from an
/// "already registered" repeat; the UI treats both as success and
/// branches on it.
#[derive(Debug, Serialize)]
pub struct RegisterForEventResponse {
    /// Human-readable summary.
    pub message: String,
    /// Outcome and attendee count.
    #[serde(flatten)]
    pub receipt: RegistrationReceipt,
}

/// `GET /api/events`
///
/// # Errors
///
/// Returns 503 if storage is unavailable.
pub async fn list_events<C, S>(
    State(state): State<AppState<C, S>>,
) -> Result<Json<Vec<EventResponse>>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let events = state.registry.list_events().await?;
    let mut feed = Vec::with_capacity(events.len());
    for event in events {
        let attendee_count = state.registry.attendee_count(event.id).await?;
        feed.push(EventResponse {
            event,
            attendee_count,
        });
    }
    Ok(Json(feed))
}

/// `GET /api/events/myevents?hostId=`
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 for non-admin callers, or when `hostId` names another host:
///   a host can never see another host's events through this route
pub async fn my_events<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<MyEventsQuery>,
) -> Result<Json<Vec<Event>>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    if !claims.is_admin() {
        return Err(AppError::forbidden("admin role required"));
    }
    if query.host_id != claims.user_id {
        return Err(AppError::forbidden("hosts may only list their own events"));
    }

    let events = state.registry.list_events_by_host(claims.user_id).await?;
    Ok(Json(events))
}

/// `POST /api/events`
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 for non-admin callers
/// - 422 on invalid fields
pub async fn create_event<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let event = state
        .engine
        .create_event(claims.user_id, claims.role, input)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /api/events/:id`
///
/// # Errors
///
/// Returns 404 for an unknown event id.
pub async fn get_event<C, S>(
    State(state): State<AppState<C, S>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let (event, attendee_count) = state.engine.event_with_count(EventId(event_id)).await?;
    Ok(Json(EventResponse {
        event,
        attendee_count,
    }))
}

/// `POST /api/events/:id/register`
///
/// Responds 201 with the created registration, or 200 with the
/// "already registered" indicator when the pair exists; the attendee
/// count rides along either way.
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 for non-student callers or a mismatched `userId` echo
/// - 404 for an unknown event
pub async fn register_for_event<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RegisterForEventRequest>,
) -> Result<(StatusCode, Json<RegisterForEventResponse>), AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    if let Some(echoed) = request.user_id {
        if echoed != claims.user_id {
            return Err(AppError::forbidden("students may only register themselves"));
        }
    }

    let receipt = state
        .engine
        .register(
            EventId(event_id),
            claims.user_id,
            claims.role,
            request.teammates,
        )
        .await?;

    let (status, message) = if receipt.outcome.is_created() {
        (StatusCode::CREATED, "Registered successfully".to_string())
    } else {
        (
            StatusCode::OK,
            "You are already registered for this event".to_string(),
        )
    };

    Ok((status, Json(RegisterForEventResponse { message, receipt })))
}

/// `GET /api/events/:id/registrations`
///
/// The attendee list behind the host dashboard, in registration order.
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 for non-admin callers or a host that does not own the event
/// - 404 for an unknown event
pub async fn event_registrations<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Registration>>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    if !claims.is_admin() {
        return Err(AppError::forbidden("admin role required"));
    }

    let event_id = EventId(event_id);
    let event = state.registry.get_event(event_id).await?;
    if event.host != claims.user_id {
        return Err(AppError::forbidden(
            "hosts may only list attendees of their own events",
        ));
    }

    let registrations = state.registry.registrations_for_event(event_id).await?;
    Ok(Json(registrations))
}

//! HTTP route table.

use crate::handlers::{auth, events, health, profile};
use crate::middleware::CorrelationIdLayer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use campus_events_auth::CredentialStore;
use campus_events_registry::{EventStore, RegistrationStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router over the given state.
///
/// Anything under `/api` other than the auth routes and the public
/// event reads requires a bearer token.
pub fn build_router<C, S>(state: AppState<C, S>) -> Router
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let api = Router::new()
        .route("/auth/register", post(auth::register::<C, S>))
        .route("/auth/login", post(auth::login::<C, S>))
        .route(
            "/events",
            get(events::list_events::<C, S>).post(events::create_event::<C, S>),
        )
        // "myevents" must be routed before the ":id" capture.
        .route("/events/myevents", get(events::my_events::<C, S>))
        .route("/events/:id", get(events::get_event::<C, S>))
        .route(
            "/events/:id/register",
            post(events::register_for_event::<C, S>),
        )
        .route(
            "/events/:id/registrations",
            get(events::event_registrations::<C, S>),
        )
        .route(
            "/users/profile",
            get(profile::get_profile::<C, S>).put(profile::update_profile::<C, S>),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorrelationIdLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! End-to-end HTTP tests over the in-memory stores.
//!
//! These go through the real router, so they exercise extractors,
//! status mapping, and the JSON wire shapes exactly as a client sees
//! them.

#![allow(clippy::unwrap_used)]
#![allow(clippy::too_many_lines)]

use axum_test::TestServer;
use campus_events_auth::TokenService;
use campus_events_web::{AppState, build_router};
use http::StatusCode;
use serde_json::{Value, json};

fn server() -> TestServer {
    let tokens = TokenService::new("test-secret", chrono::Duration::days(1), 1);
    TestServer::new(build_router(AppState::in_memory(tokens))).unwrap()
}

/// Register an account and return `(id, token)`.
async fn signup(server: &TestServer, name: &str, email: &str, role: &str) -> (String, String) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "hunter2hunter2",
            "role": role,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    (
        body["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

async fn create_event(server: &TestServer, token: &str, title: &str) -> Value {
    let response = server
        .post("/api/events")
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "description": "24 hour hackathon",
            "date": "2026-09-01T09:00:00Z",
            "location": "Main Hall",
            "category": "Technical",
            "fee": 100,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let server = server();

    // A client-supplied id comes back on the response.
    let supplied = uuid::Uuid::new_v4();
    let response = server
        .get("/health")
        .add_header(
            http::HeaderName::from_static("x-correlation-id"),
            http::HeaderValue::from_str(&supplied.to_string()).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let echoed = response.headers();
    let echoed = echoed
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok());
    assert_eq!(echoed, Some(supplied.to_string().as_str()));

    // Without one, the server mints a fresh UUID.
    let response = server.get("/health").await;
    let headers = response.headers();
    let generated = headers
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let server = server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn full_registration_flow() {
    let server = server();
    let (host_id, host_token) = signup(&server, "College A", "host@college-a.edu", "admin").await;
    let event = create_event(&server, &host_token, "Hackathon").await;
    let event_id = event["id"].as_str().unwrap();
    assert_eq!(event["host"].as_str().unwrap(), host_id);
    assert_eq!(event["fee"], 100);
    assert_eq!(event["category"], "Technical");

    let (alice_id, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&alice_token)
        .json(&json!({ "teammates": ["Bob", "Carol"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "created");
    assert_eq!(body["attendeeCount"], 1);
    assert_eq!(body["registration"]["teammates"], json!(["Bob", "Carol"]));
    assert_eq!(body["registration"]["studentId"].as_str().unwrap(), alice_id);

    // The event detail view reflects the registration.
    let response = server.get(&format!("/api/events/{event_id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["attendeeCount"], 1);

    // So does Alice's profile, with the event expanded inline.
    let response = server
        .get("/api/users/profile")
        .authorization_bearer(&alice_token)
        .add_query_param("userId", &alice_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let registered = body["registeredEvents"].as_array().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0]["id"].as_str().unwrap(), event_id);

    // And the host dashboard lists the event.
    let response = server
        .get("/api/events/myevents")
        .authorization_bearer(&host_token)
        .add_query_param("hostId", &host_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn repeat_registration_is_reported_not_duplicated() {
    let server = server();
    let (_, host_token) = signup(&server, "College A", "host@college-a.edu", "admin").await;
    let event = create_event(&server, &host_token, "Hackathon").await;
    let event_id = event["id"].as_str().unwrap();
    let (_, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let first = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&alice_token)
        .json(&json!({ "teammates": ["Bob"] }))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&alice_token)
        .json(&json!({ "teammates": ["Someone", "Else"] }))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let body: Value = second.json();
    assert_eq!(body["status"], "alreadyRegistered");
    assert_eq!(body["attendeeCount"], 1);
    // The original registration wins; the retry's teammates are ignored.
    assert_eq!(body["registration"]["teammates"], json!(["Bob"]));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let server = server();
    signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Imposter",
            "email": "ALICE@uni.edu",
            "password": "hunter2hunter2",
            "role": "student",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn login_failures_are_unauthorized() {
    let server = server();
    signup(&server, "Alice", "alice@uni.edu", "student").await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@uni.edu", "password": "nope" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);

    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@uni.edu", "password": "nope" }))
        .await;
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);

    // Both failures carry the identical body.
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn login_returns_identity_with_token() {
    let server = server();
    let (alice_id, _) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@uni.edu", "password": "hunter2hunter2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"].as_str().unwrap(), alice_id);
    assert_eq!(body["role"], "student");
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn event_creation_is_admin_only() {
    let server = server();
    let (_, student_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .post("/api/events")
        .authorization_bearer(&student_token)
        .json(&json!({
            "title": "Rogue Event",
            "description": "no",
            "date": "2026-09-01T09:00:00Z",
            "location": "Anywhere",
            "category": "Other",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_registration_is_student_only() {
    let server = server();
    let (_, host_token) = signup(&server, "College A", "host@college-a.edu", "admin").await;
    let event = create_event(&server, &host_token, "Hackathon").await;
    let event_id = event["id"].as_str().unwrap();

    let response = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&host_token)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let server = server();

    let missing = server.get("/api/users/profile").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = server
        .get("/api/users/profile")
        .authorization_bearer("not-a-token")
        .add_query_param("userId", uuid::Uuid::new_v4().to_string())
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profiles_are_owner_scoped() {
    let server = server();
    let (alice_id, _) = signup(&server, "Alice", "alice@uni.edu", "student").await;
    let (_, mallory_token) = signup(&server, "Mallory", "mallory@uni.edu", "student").await;

    let response = server
        .get("/api/users/profile")
        .authorization_bearer(&mallory_token)
        .add_query_param("userId", &alice_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_update_merges_and_is_role_gated() {
    let server = server();
    let (alice_id, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .put("/api/users/profile")
        .authorization_bearer(&alice_token)
        .json(&json!({
            "studentDetails": { "branch": "CSE", "year": "3" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // A second partial patch leaves earlier fields in place.
    let response = server
        .put("/api/users/profile")
        .authorization_bearer(&alice_token)
        .json(&json!({
            "studentDetails": { "universityRegNo": "U-1234" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["id"].as_str().unwrap(), alice_id);
    assert_eq!(body["studentDetails"]["branch"], "CSE");
    assert_eq!(body["studentDetails"]["year"], "3");
    assert_eq!(body["studentDetails"]["universityRegNo"], "U-1234");

    // A student cannot touch the college sub-document.
    let response = server
        .put("/api/users/profile")
        .authorization_bearer(&alice_token)
        .json(&json!({
            "collegeDetails": { "collegeName": "College A" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Supplying both sub-documents is malformed.
    let response = server
        .put("/api/users/profile")
        .authorization_bearer(&alice_token)
        .json(&json!({
            "studentDetails": {},
            "collegeDetails": {},
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn attendee_list_is_visible_to_the_owning_host_only() {
    let server = server();
    let (_, host_a_token) = signup(&server, "College A", "a@college.edu", "admin").await;
    let (_, host_b_token) = signup(&server, "College B", "b@college.edu", "admin").await;
    let event = create_event(&server, &host_a_token, "Hackathon").await;
    let event_id = event["id"].as_str().unwrap();

    let (alice_id, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;
    let response = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&alice_token)
        .json(&json!({ "teammates": ["Bob"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .get(&format!("/api/events/{event_id}/registrations"))
        .authorization_bearer(&host_a_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let attendees = body.as_array().unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0]["studentId"].as_str().unwrap(), alice_id);
    assert_eq!(attendees[0]["teammates"], json!(["Bob"]));

    // Another host cannot read the list; neither can the student.
    let other_host = server
        .get(&format!("/api/events/{event_id}/registrations"))
        .authorization_bearer(&host_b_token)
        .await;
    assert_eq!(other_host.status_code(), StatusCode::FORBIDDEN);

    let student = server
        .get(&format!("/api/events/{event_id}/registrations"))
        .authorization_bearer(&alice_token)
        .await;
    assert_eq!(student.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn host_dashboard_is_scoped_to_the_caller() {
    let server = server();
    let (_, host_a_token) = signup(&server, "College A", "a@college.edu", "admin").await;
    let (host_b_id, _) = signup(&server, "College B", "b@college.edu", "admin").await;

    let response = server
        .get("/api/events/myevents")
        .authorization_bearer(&host_a_token)
        .add_query_param("hostId", &host_b_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_feed_is_public_and_date_ordered() {
    let server = server();
    let (_, host_token) = signup(&server, "College A", "host@college-a.edu", "admin").await;

    for (title, date) in [
        ("Later", "2026-12-01T09:00:00Z"),
        ("Sooner", "2026-09-01T09:00:00Z"),
    ] {
        let response = server
            .post("/api/events")
            .authorization_bearer(&host_token)
            .json(&json!({
                "title": title,
                "description": "d",
                "date": date,
                "location": "Main Hall",
                "category": "Cultural",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = server.get("/api/events").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Sooner", "Later"]);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let server = server();
    let response = server
        .get(&format!("/api/events/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn registering_for_unknown_event_is_not_found() {
    let server = server();
    let (_, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;

    let response = server
        .post(&format!("/api/events/{}/register", uuid::Uuid::new_v4()))
        .authorization_bearer(&alice_token)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_body_user_id_must_match_the_token() {
    let server = server();
    let (_, host_token) = signup(&server, "College A", "host@college-a.edu", "admin").await;
    let event = create_event(&server, &host_token, "Hackathon").await;
    let event_id = event["id"].as_str().unwrap();
    let (_, alice_token) = signup(&server, "Alice", "alice@uni.edu", "student").await;
    let (bob_id, _) = signup(&server, "Bob", "bob@uni.edu", "student").await;

    let response = server
        .post(&format!("/api/events/{event_id}/register"))
        .authorization_bearer(&alice_token)
        .json(&json!({ "userId": bob_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

//! Integration tests for the credential service over the in-memory store.

use campus_events_auth::{CredentialService, InMemoryCredentialStore, TokenService};
use campus_events_core::identity::{CollegeDetailsPatch, StudentDetailsPatch};
use campus_events_core::{Error, ProfilePatch, Role};
use chrono::Duration;
use std::sync::Arc;

fn service() -> CredentialService<InMemoryCredentialStore> {
    CredentialService::new(Arc::new(InMemoryCredentialStore::new()))
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn register_then_authenticate() {
    let service = service();

    let created = service
        .register("Alice", "alice@example.edu", "hunter2", Role::Student)
        .await
        .unwrap();

    let authed = service.authenticate("alice@example.edu", "hunter2").await;
    assert_eq!(authed.map(|i| i.id), Ok(created.id));
}

#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively() {
    let service = service();
    let first = service
        .register("Alice", "alice@example.edu", "hunter2", Role::Student)
        .await;
    assert!(first.is_ok());

    let second = service
        .register("Mallory", "ALICE@example.EDU", "other-pass", Role::Student)
        .await;
    assert_eq!(second.map(|i| i.id), Err(Error::DuplicateEmail));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let service = service();
    let _ = service
        .register("Alice", "alice@example.edu", "hunter2", Role::Student)
        .await;

    let wrong_password = service.authenticate("alice@example.edu", "nope").await;
    let unknown_email = service.authenticate("bob@example.edu", "nope").await;

    assert_eq!(wrong_password.map(|i| i.id), Err(Error::InvalidCredentials));
    assert_eq!(unknown_email.map(|i| i.id), Err(Error::InvalidCredentials));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn issued_token_verifies_back_to_the_identity() {
    let service = service();
    let tokens = TokenService::new("integration-secret", Duration::hours(1), 1);

    let host = service
        .register("Host", "host@college.edu", "hunter2", Role::Admin)
        .await
        .unwrap();

    let token = tokens.issue(&host).unwrap();
    let claims = tokens.verify(&token);
    assert_eq!(claims.map(|c| (c.user_id, c.role)), Ok((host.id, Role::Admin)));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn profile_patch_is_role_gated() {
    let service = service();
    let alice = service
        .register("Alice", "alice@example.edu", "hunter2", Role::Student)
        .await
        .unwrap();

    // Student patching college details is rejected before any write.
    let cross = service
        .update_profile(
            alice.id,
            ProfilePatch::College(CollegeDetailsPatch::default()),
        )
        .await;
    assert_eq!(
        cross.map(|i| i.id),
        Err(Error::Forbidden {
            required: "admin role".to_string()
        })
    );

    let ok = service
        .update_profile(
            alice.id,
            ProfilePatch::Student(StudentDetailsPatch {
                branch: Some("CSE".to_string()),
                ..Default::default()
            }),
        )
        .await;
    let branch = ok.ok().and_then(|i| i.student_details).map(|d| d.branch);
    assert_eq!(branch, Some("CSE".to_string()));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn partial_patch_preserves_previously_set_fields() {
    let service = service();
    let alice = service
        .register("Alice", "alice@example.edu", "hunter2", Role::Student)
        .await
        .unwrap();

    let _ = service
        .update_profile(
            alice.id,
            ProfilePatch::Student(StudentDetailsPatch {
                branch: Some("CSE".to_string()),
                year: Some("2".to_string()),
                university_reg_no: Some("U123".to_string()),
            }),
        )
        .await;

    let after = service
        .update_profile(
            alice.id,
            ProfilePatch::Student(StudentDetailsPatch {
                branch: Some("ECE".to_string()),
                ..Default::default()
            }),
        )
        .await;

    let details = after.ok().and_then(|i| i.student_details);
    assert_eq!(details.as_ref().map(|d| d.branch.as_str()), Some("ECE"));
    assert_eq!(details.as_ref().map(|d| d.year.as_str()), Some("2"));
    assert_eq!(
        details.as_ref().map(|d| d.university_reg_no.as_str()),
        Some("U123")
    );
}

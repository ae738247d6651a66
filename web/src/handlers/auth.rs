//! Authentication endpoints.
//!
//! - `POST /api/auth/register` - create an identity, return it with a token
//! - `POST /api/auth/login` - authenticate, return the identity with a token
//!
//! Both respond with the identity fields flattened next to the token,
//! the shape the client session layer caches.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use campus_events_auth::CredentialStore;
use campus_events_core::{CollegeDetails, Identity, Role, StudentDetails, UserId};
use campus_events_registry::{EventStore, RegistrationStore};
use serde::{Deserialize, Serialize};

/// Request to create an identity.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email, unique across all identities.
    pub email: String,
    /// Plaintext password; hashed before storage, never logged.
    pub password: String,
    /// Role, immutable after creation.
    pub role: Role,
}

/// Request to authenticate.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// An identity as exposed over the wire (no credentials).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Student sub-document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_details: Option<StudentDetails>,
    /// College sub-document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_details: Option<CollegeDetails>,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
            role: identity.role,
            student_details: identity.student_details,
            college_details: identity.college_details,
        }
    }
}

/// Identity plus a freshly issued session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The identity, flattened into the top-level object.
    #[serde(flatten)]
    pub user: UserResponse,
    /// Signed session token.
    pub token: String,
}

/// `POST /api/auth/register`
///
/// # Errors
///
/// - 422 on malformed input
/// - 409 if the email is already registered (case-insensitive)
pub async fn register<C, S>(
    State(state): State<AppState<C, S>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let identity = state
        .credentials
        .register(&request.name, &request.email, &request.password, request.role)
        .await?;
    let token = state.tokens.issue(&identity)?;

    metrics::counter!("campus_identities_created_total").increment(1);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: identity.into(),
            token,
        }),
    ))
}

/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 401 on any credential mismatch; unknown email and wrong
/// password are indistinguishable.
pub async fn login<C, S>(
    State(state): State<AppState<C, S>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    let identity = state
        .credentials
        .authenticate(&request.email, &request.password)
        .await?;
    let token = state.tokens.issue(&identity)?;

    Ok(Json(AuthResponse {
        user: identity.into(),
        token,
    }))
}

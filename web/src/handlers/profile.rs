//! Profile endpoints.
//!
//! - `GET /api/users/profile?userId=` - fetch the caller's profile,
//!   with the student's registered events expanded inline
//! - `PUT /api/users/profile` - merge a role-specific patch into the
//!   caller's sub-document

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::handlers::auth::UserResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use campus_events_auth::CredentialStore;
use campus_events_core::{
    CollegeDetailsPatch, Event, ProfilePatch, Role, StudentDetailsPatch, UserId,
};
use campus_events_registry::{EventStore, RegistrationStore};
use serde::{Deserialize, Serialize};

/// Query parameters for the profile fetch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    /// Identity to fetch; must be the caller.
    pub user_id: UserId,
}

/// A profile with the student's registered events expanded.
///
/// `registeredEvents` is always present for students (possibly empty)
/// and always empty for admins.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The identity fields.
    #[serde(flatten)]
    pub user: UserResponse,
    /// Events the student has registered for, in registration order.
    pub registered_events: Vec<Event>,
}

/// Body of a profile update.
///
/// Exactly one of `studentDetails` or `collegeDetails` must be set,
/// and it must match the caller's role.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Optional echo of the caller's id; must match the token if given.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Student patch; students only.
    #[serde(default)]
    pub student_details: Option<StudentDetailsPatch>,
    /// College patch; admins only.
    #[serde(default)]
    pub college_details: Option<CollegeDetailsPatch>,
}

/// `GET /api/users/profile?userId=`
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 when `userId` names another identity
/// - 404 if the identity no longer exists
pub async fn get_profile<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileResponse>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    if query.user_id != claims.user_id {
        return Err(AppError::forbidden("profiles are visible to their owner only"));
    }

    let identity = state.credentials.get(claims.user_id).await?;
    let registered_events = if identity.role == Role::Student {
        state.engine.registered_events(claims.user_id).await?
    } else {
        Vec::new()
    };

    Ok(Json(ProfileResponse {
        user: identity.into(),
        registered_events,
    }))
}

/// `PUT /api/users/profile`
///
/// # Errors
///
/// - 401 without a valid token
/// - 403 on an ownership or role mismatch
/// - 422 when zero or both patch sub-documents are supplied
pub async fn update_profile<C, S>(
    State(state): State<AppState<C, S>>,
    AuthUser(claims): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError>
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    if let Some(echoed) = request.user_id {
        if echoed != claims.user_id {
            return Err(AppError::forbidden("profiles may only be edited by their owner"));
        }
    }

    let patch = match (request.student_details, request.college_details) {
        (Some(student), None) => ProfilePatch::Student(student),
        (None, Some(college)) => ProfilePatch::College(college),
        (None, None) => {
            return Err(AppError::validation(
                "one of studentDetails or collegeDetails is required",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(AppError::validation(
                "studentDetails and collegeDetails are mutually exclusive",
            ));
        }
    };

    let identity = state
        .credentials
        .update_profile(claims.user_id, patch)
        .await?;
    Ok(Json(identity.into()))
}

//! Custom Axum extractors.
//!
//! - `BearerToken`: raw token from the `Authorization` header
//! - `AuthUser`: verified identity claim; use as a handler parameter to
//!   require authentication

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use campus_events_auth::{AuthClaims, CredentialStore};
use campus_events_registry::{EventStore, RegistrationStore};

/// Bearer token extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// Verified identity claim of the calling user.
///
/// Verification is stateless: the token's signature, expiry, and key
/// epoch are checked against the app's token service; no database
/// round-trip happens here, and nothing client-cached is trusted.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthClaims);

#[async_trait]
impl<C, S> FromRequestParts<AppState<C, S>> for AuthUser
where
    C: CredentialStore + Clone + 'static,
    S: EventStore + RegistrationStore + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C, S>,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.tokens.verify(&bearer.0)?;
        Ok(Self(claims))
    }
}

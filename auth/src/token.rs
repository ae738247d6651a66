//! Signed session tokens.
//!
//! Tokens are JWTs carrying the identity id, role, and a signing-key
//! epoch. Verification is stateless: no database round-trip, and the
//! backend trusts only the verified claim on every request.

use campus_events_core::{Identity, Role, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of token verification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// Signature or structure is invalid.
    #[error("token is malformed")]
    Malformed,
    /// Token was signed under a rotated key epoch.
    #[error("token has been revoked")]
    Revoked,
}

/// Verified identity claim decoded from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthClaims {
    /// The authenticated identity.
    pub user_id: UserId,
    /// Role claim, used for admin/student gating.
    pub role: Role,
}

impl AuthClaims {
    /// `true` if the claim carries the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Wire format of the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the identity id.
    sub: String,
    /// Role claim.
    role: Role,
    /// Signing-key epoch; bumping it revokes all outstanding tokens.
    epoch: u32,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    key_epoch: u32,
}

impl TokenService {
    /// Create a token service over an HMAC secret.
    ///
    /// `key_epoch` identifies the current signing-key generation;
    /// tokens minted under an older epoch verify as revoked.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration, key_epoch: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            key_epoch,
        }
    }

    /// Issue a token for an identity.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Malformed` if signing fails (bad key
    /// material); this does not happen with HMAC secrets in practice.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            role: identity.role,
            epoch: self.key_epoch,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Malformed)
    }

    /// Verify a token and decode its identity claim.
    ///
    /// # Errors
    ///
    /// - `TokenError::Expired` past the embedded expiry
    /// - `TokenError::Malformed` on bad signature or structure
    /// - `TokenError::Revoked` when the key epoch has rotated
    pub fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.epoch != self.key_epoch {
            return Err(TokenError::Revoked);
        }

        let user_id = UserId::parse(&data.claims.sub).map_err(|_| TokenError::Malformed)?;
        Ok(AuthClaims {
            user_id,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new(),
            name: "Alice".to_string(),
            email: "alice@example.edu".to_string(),
            password_hash: String::new(),
            role,
            student_details: None,
            college_details: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issue_then_verify_preserves_claims() {
        let service = TokenService::new("test-secret", Duration::hours(1), 1);
        let alice = identity(Role::Student);

        let token = service.issue(&alice).unwrap_or_default();
        let claims = service.verify(&token);

        assert_eq!(
            claims,
            Ok(AuthClaims {
                user_id: alice.id,
                role: Role::Student,
            })
        );
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = TokenService::new("test-secret", Duration::hours(-1), 1);
        let token = service.issue(&identity(Role::Student)).unwrap_or_default();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_tokens_are_malformed() {
        let service = TokenService::new("test-secret", Duration::hours(1), 1);
        assert_eq!(service.verify("not.a.jwt"), Err(TokenError::Malformed));
    }

    #[test]
    fn tokens_from_another_secret_are_malformed() {
        let issuer = TokenService::new("secret-a", Duration::hours(1), 1);
        let verifier = TokenService::new("secret-b", Duration::hours(1), 1);

        let token = issuer.issue(&identity(Role::Admin)).unwrap_or_default();
        assert_eq!(verifier.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn rotated_epoch_revokes_outstanding_tokens() {
        let old = TokenService::new("test-secret", Duration::hours(1), 1);
        let new = TokenService::new("test-secret", Duration::hours(1), 2);

        let token = old.issue(&identity(Role::Admin)).unwrap_or_default();
        assert_eq!(new.verify(&token), Err(TokenError::Revoked));
    }

    #[test]
    fn admin_claim_gates() {
        let service = TokenService::new("test-secret", Duration::hours(1), 1);
        let token = service.issue(&identity(Role::Admin)).unwrap_or_default();
        let claims = service.verify(&token).unwrap_or(AuthClaims {
            user_id: UserId::new(),
            role: Role::Student,
        });
        assert!(claims.is_admin());
    }
}

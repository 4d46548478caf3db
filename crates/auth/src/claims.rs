//! Identity token claims model (transport-agnostic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PrincipalId, Role};

/// The minimal set of claims expected once a token has been decoded and its
/// signature verified by the transport layer in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    /// Email attached to the identity, when the provider supplies one.
    pub email: Option<String>,

    /// Role claim resolved upstream (admin or plan tier).
    pub role: Role,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate identity claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is the [`crate::TokenVerifier`]'s job.
pub fn validate_claims(
    claims: &IdentityClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_offset_mins: i64, expires_offset_mins: i64, now: DateTime<Utc>) -> IdentityClaims {
        IdentityClaims {
            sub: PrincipalId::new("subject-1"),
            email: Some("user@example.com".to_string()),
            role: Role::new("pro"),
            issued_at: now + Duration::minutes(issued_offset_mins),
            expires_at: now + Duration::minutes(expires_offset_mins),
        }
    }

    #[test]
    fn accepts_claims_inside_the_validity_window() {
        let now = Utc::now();
        assert!(validate_claims(&claims(-5, 5, now), now).is_ok());
    }

    #[test]
    fn rejects_expired_claims() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(-10, -1, now), now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_claims_issued_in_the_future() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(5, 10, now), now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_time_window() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(5, -5, now), now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}

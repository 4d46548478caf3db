//! Token verification seam.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::claims::{IdentityClaims, TokenValidationError, validate_claims};
use crate::{PrincipalId, Role};

/// Verifies a bearer token and yields the authenticated claims.
///
/// The production deployment fronts a managed identity provider; tests and
/// local development use [`Hs256TokenVerifier`] with a shared secret.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>)
    -> Result<IdentityClaims, TokenValidationError>;
}

/// Wire-format claims as they appear inside the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 JWT verifier.
///
/// Decodes and signature-checks the token, then applies the deterministic
/// claim validation from [`validate_claims`]. Time-window checks are done
/// here rather than by the JWT library so the same rules apply to every
/// verifier implementation.
pub struct Hs256TokenVerifier {
    decoding: DecodingKey,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<IdentityClaims, TokenValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let decoded = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        let claims = IdentityClaims {
            sub: PrincipalId::new(decoded.claims.sub),
            email: decoded.claims.email,
            role: Role::new(decoded.claims.role),
            issued_at: timestamp(decoded.claims.iat)?,
            expires_at: timestamp(decoded.claims.exp)?,
        };

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenValidationError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| TokenValidationError::Malformed(format!("bad unix timestamp: {secs}")))
}

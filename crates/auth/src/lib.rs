//! `prepdeck-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. The identity
//! provider itself is an external collaborator: it sits behind the
//! [`TokenVerifier`] trait and yields an authenticated principal with a role
//! claim.

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod roles;
pub mod verifier;

pub use authorize::{AuthzError, require_admin, require_role};
pub use claims::{IdentityClaims, TokenValidationError, validate_claims};
pub use principal::PrincipalId;
pub use roles::Role;
pub use verifier::{Hs256TokenVerifier, TokenVerifier};

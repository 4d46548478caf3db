//! Role guard functions (checked before handler invocation).
//!
//! Role-based gating is an explicit check against the resolved principal's
//! role claim; handlers call the guard at the top, before touching services.

use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires role '{0}'")]
    MissingRole(String),
}

/// Require an exact role claim.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn require_role(role: &Role, required: &str) -> Result<(), AuthzError> {
    if role.as_str() == required {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(required.to_string()))
    }
}

/// Require the admin role.
pub fn require_admin(role: &Role) -> Result<(), AuthzError> {
    require_role(role, Role::ADMIN)
}

//! Per-request principal context.

use prepdeck_auth::{PrincipalId, Role};

/// Authenticated identity for a request, resolved by the auth middleware
/// from the bearer token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    email: Option<String>,
    role: Role,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, email: Option<String>, role: Role) -> Self {
        Self {
            principal_id,
            email,
            role,
        }
    }

    pub fn principal_id(&self) -> &PrincipalId {
        &self.principal_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}

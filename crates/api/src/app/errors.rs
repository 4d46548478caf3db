//! Mapping service errors onto envelope responses.

use axum::http::StatusCode;
use axum::response::Response;

use prepdeck_auth::AuthzError;
use prepdeck_core::DomainError;

use crate::app::envelope;

/// Map a service-layer error onto the envelope.
///
/// Domain failures keep their caller-visible messages; anything unexpected
/// is logged and collapsed into a generic 500.
pub fn error_to_response(err: anyhow::Error) -> Response {
    if let Some(domain) = err.downcast_ref::<DomainError>() {
        return domain_error_to_response(domain);
    }
    if let Some(authz) = err.downcast_ref::<AuthzError>() {
        return envelope::error(StatusCode::FORBIDDEN, "forbidden", authz.to_string());
    }

    tracing::error!(error = %err, "unhandled service error");
    envelope::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn domain_error_to_response(err: &DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => {
            envelope::error(StatusCode::BAD_REQUEST, "validation_error", msg.clone())
        }
        DomainError::InvalidId(msg) => {
            envelope::error(StatusCode::BAD_REQUEST, "invalid_id", msg.clone())
        }
        DomainError::NotFound => {
            envelope::error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        DomainError::Conflict(msg) => {
            envelope::error(StatusCode::CONFLICT, "conflict", msg.clone())
        }
        DomainError::Unauthorized => {
            envelope::error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

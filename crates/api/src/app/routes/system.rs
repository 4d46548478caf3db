use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::app::envelope;
use crate::context::PrincipalContext;

/// Public liveness probe (outside the envelope, no auth).
pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    axum::extract::Extension(principal): axum::extract::Extension<PrincipalContext>,
) -> impl IntoResponse {
    envelope::ok(serde_json::json!({
        "principal_id": principal.principal_id().to_string(),
        "email": principal.email(),
        "role": principal.role().as_str(),
    }))
}

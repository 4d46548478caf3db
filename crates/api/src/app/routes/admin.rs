//! Admin routes.
//!
//! All payloads here are static example data; real reporting has no backing
//! store yet.

use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::get, routing::post};

use prepdeck_auth::require_admin;

use crate::app::envelope;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/system/restart", post(system_restart))
        .route("/user-activities", get(user_activities))
        .route("/system/config", get(system_config))
}

fn guard(principal: &PrincipalContext) -> Result<(), Response> {
    require_admin(principal.role()).map_err(|e| {
        envelope::error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}

/// GET /admin/stats
pub async fn stats(
    axum::extract::Extension(principal): axum::extract::Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&principal) {
        return resp;
    }

    envelope::ok(serde_json::json!({
        "total_accounts": 1284,
        "active_subscriptions": 312,
        "interviews_this_month": 8764,
        "plans": { "free": 893, "standard": 287, "pro": 104 },
    }))
}

/// POST /admin/system/restart - acknowledged, but nothing restarts.
pub async fn system_restart(
    axum::extract::Extension(principal): axum::extract::Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&principal) {
        return resp;
    }

    tracing::warn!("system restart requested; restart handling is not wired up");
    envelope::ok_with_message("restart scheduled", serde_json::Value::Null)
}

/// GET /admin/user-activities
pub async fn user_activities(
    axum::extract::Extension(principal): axum::extract::Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&principal) {
        return resp;
    }

    envelope::ok(serde_json::json!([
        { "subject": "usr_3f9c", "action": "subscription.started", "at": "2026-08-01T09:14:02Z" },
        { "subject": "usr_81aa", "action": "interview.completed", "at": "2026-08-01T10:02:47Z" },
        { "subject": "usr_3f9c", "action": "settings.updated", "at": "2026-08-02T16:33:10Z" },
    ]))
}

/// GET /admin/system/config
pub async fn system_config(
    axum::extract::Extension(principal): axum::extract::Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&principal) {
        return resp;
    }

    envelope::ok(serde_json::json!({
        "maintenance_mode": false,
        "signup_enabled": true,
        "interview_engine": "v2",
        "max_upload_mb": 25,
    }))
}

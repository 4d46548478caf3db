//! Account routes.

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Response;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;

use prepdeck_accounts::Account;
use prepdeck_core::Entity;

use crate::app::envelope;
use crate::app::errors;
use crate::app::routes::common::require_account;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

#[derive(Debug, Deserialize)]
pub struct RegisterAccountRequest {
    pub display_name: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
}

/// POST /accounts/register - create (or return) the caller's account.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterAccountRequest>,
) -> Response {
    match services
        .accounts
        .register(
            principal.principal_id().clone(),
            principal.email().map(str::to_string),
            &body.display_name,
            principal.role().clone(),
        )
        .await
    {
        Ok(account) => envelope::created(account_to_json(&account)),
        Err(err) => errors::error_to_response(err),
    }
}

/// GET /accounts/me
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match require_account(&services, &principal).await {
        Ok((_, account)) => envelope::ok(account_to_json(&account)),
        Err(resp) => resp,
    }
}

fn account_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": account.id().map(|id| id.as_i64()),
        "subject": account.subject().as_str(),
        "email": account.email(),
        "display_name": account.display_name(),
        "role": account.role().as_str(),
        "created_at": account.created_at().to_rfc3339(),
    })
}

//! Shared handler helpers.

use axum::http::StatusCode;
use axum::response::Response;

use prepdeck_accounts::Account;
use prepdeck_core::{AccountId, Entity};

use crate::app::envelope;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Resolve the caller's registered account, or answer with the 404 envelope.
///
/// Most per-caller endpoints require a prior `POST /accounts/register`.
/// Stored accounts always carry a key, so the id is handed back alongside.
pub async fn require_account(
    services: &AppServices,
    principal: &PrincipalContext,
) -> Result<(AccountId, Account), Response> {
    match services.accounts.find_by_subject(principal.principal_id()).await {
        Ok(Some(account)) => match account.id() {
            Some(id) => Ok((id, account)),
            None => Err(envelope::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "stored account has no key",
            )),
        },
        Ok(None) => Err(envelope::error(
            StatusCode::NOT_FOUND,
            "account_not_registered",
            "no account registered for this identity",
        )),
        Err(err) => Err(crate::app::errors::error_to_response(err)),
    }
}

/// Parse a numeric path id, or answer with the 400 envelope.
pub fn parse_id(raw: &str) -> Result<i64, Response> {
    raw.parse::<i64>()
        .map_err(|_| envelope::error(StatusCode::BAD_REQUEST, "invalid_id", "id must be numeric"))
}

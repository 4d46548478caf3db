//! Per-caller settings routes.

use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Response;

use prepdeck_accounts::SettingsMap;
use prepdeck_billing::PlanTier;

use crate::app::envelope;
use crate::app::errors;
use crate::app::routes::common::require_account;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// GET /config
pub async fn get_basic(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services.accounts.settings(account_id).await {
        Ok(settings) => envelope::ok(settings.basic),
        Err(err) => errors::error_to_response(err),
    }
}

/// PUT /config
pub async fn put_basic(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<SettingsMap>,
) -> Response {
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services.accounts.update_settings(account_id, body).await {
        Ok(settings) => envelope::ok_with_message("settings updated", settings.basic),
        Err(err) => errors::error_to_response(err),
    }
}

/// GET /config/advanced - Standard/Pro tiers only.
pub async fn get_advanced(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = require_paid_tier(&principal) {
        return resp;
    }
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services.accounts.settings(account_id).await {
        Ok(settings) => envelope::ok(settings.advanced),
        Err(err) => errors::error_to_response(err),
    }
}

/// PUT /config/advanced - Standard/Pro tiers only.
pub async fn put_advanced(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<SettingsMap>,
) -> Response {
    if let Err(resp) = require_paid_tier(&principal) {
        return resp;
    }
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services
        .accounts
        .update_advanced_settings(account_id, body)
        .await
    {
        Ok(settings) => envelope::ok_with_message("settings updated", settings.advanced),
        Err(err) => errors::error_to_response(err),
    }
}

fn require_paid_tier(principal: &PrincipalContext) -> Result<(), Response> {
    match PlanTier::from_claim(principal.role().as_str()) {
        PlanTier::Standard | PlanTier::Pro => Ok(()),
        PlanTier::Free => Err(envelope::error(
            StatusCode::FORBIDDEN,
            "tier_required",
            "advanced settings require a standard or pro subscription",
        )),
    }
}

//! Quota routes: usage figures derived from the caller's role claim.

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Response;

use prepdeck_billing::PlanTier;

use crate::app::envelope;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// GET /quota
pub async fn quota(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let tier = PlanTier::from_claim(principal.role().as_str());
    let usage = services.subscriptions.quota_for_tier(tier);

    envelope::ok(serde_json::json!({
        "tier": tier.as_str(),
        "limit": usage.limit,
        "used": usage.used,
        "remaining": usage.remaining(),
        "percentage": usage.percentage(),
    }))
}

/// GET /quota/history - no usage ledger exists yet, so the list is empty.
pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let tier = PlanTier::from_claim(principal.role().as_str());
    let history = services.subscriptions.usage_history(tier);

    envelope::ok(serde_json::json!({
        "tier": tier.as_str(),
        "entries": history,
    }))
}

//! Subscription routes.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;

use prepdeck_billing::{Plan, PlanId, Subscription, SubscriptionId};
use prepdeck_core::Entity;

use crate::app::envelope;
use crate::app::errors;
use crate::app::routes::common::{parse_id, require_account};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

#[derive(Debug, Deserialize)]
pub struct StartSubscriptionRequest {
    pub plan_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    pub plan_id: i64,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(start))
        .route("/:id/cancel", post(cancel))
        .route("/:id/change-plan", post(change_plan))
        .route("/:id/use", post(use_interview))
}

/// GET /plans - the sellable catalog.
pub async fn list_plans(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.subscriptions.plans().await {
        Ok(plans) => {
            let items: Vec<serde_json::Value> = plans.iter().map(plan_to_json).collect();
            envelope::ok(items)
        }
        Err(err) => errors::error_to_response(err),
    }
}

/// POST /subscriptions - start a subscription for the caller's account.
pub async fn start(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<StartSubscriptionRequest>,
) -> Response {
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services
        .subscriptions
        .start_subscription(account_id, PlanId::from_raw(body.plan_id))
        .await
    {
        Ok(subscription) => envelope::created(subscription_to_json(&subscription)),
        Err(err) => errors::error_to_response(err),
    }
}

/// GET /subscriptions - the caller's subscriptions.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let (account_id, _) = match require_account(&services, &principal).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match services.subscriptions.for_account(account_id).await {
        Ok(subscriptions) => {
            let items: Vec<serde_json::Value> =
                subscriptions.iter().map(subscription_to_json).collect();
            envelope::ok(items)
        }
        Err(err) => errors::error_to_response(err),
    }
}

/// POST /subscriptions/:id/cancel
pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => SubscriptionId::from_raw(id),
        Err(resp) => return resp,
    };

    match services.subscriptions.cancel(id).await {
        Ok(subscription) => {
            envelope::ok_with_message("subscription canceled", subscription_to_json(&subscription))
        }
        Err(err) => errors::error_to_response(err),
    }
}

/// POST /subscriptions/:id/change-plan
pub async fn change_plan(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ChangePlanRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => SubscriptionId::from_raw(id),
        Err(resp) => return resp,
    };

    match services
        .subscriptions
        .change_plan(id, PlanId::from_raw(body.plan_id))
        .await
    {
        Ok(subscription) => {
            envelope::ok_with_message("plan changed", subscription_to_json(&subscription))
        }
        Err(err) => errors::error_to_response(err),
    }
}

/// POST /subscriptions/:id/use - consume one interview credit.
///
/// Credit accounting is not implemented; the success envelope carries no
/// data until a receipt exists to return.
pub async fn use_interview(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => SubscriptionId::from_raw(id),
        Err(resp) => return resp,
    };

    match services.subscriptions.use_interview(id).await {
        Ok(receipt) => envelope::ok_with_message("interview usage not recorded", receipt),
        Err(err) => errors::error_to_response(err),
    }
}

fn plan_to_json(plan: &Plan) -> serde_json::Value {
    serde_json::json!({
        "id": plan.id().map(|id| id.as_i64()),
        "tier": plan.tier().as_str(),
        "name": plan.name(),
        "monthly_limit": plan.monthly_limit(),
        "price_cents": plan.price_cents(),
    })
}

fn subscription_to_json(subscription: &Subscription) -> serde_json::Value {
    serde_json::json!({
        "id": subscription.id().map(|id| id.as_i64()),
        "account_id": subscription.account_id().as_i64(),
        "plan_id": subscription.plan_id().as_i64(),
        "status": subscription.status(),
        "started_at": subscription.started_at().to_rfc3339(),
    })
}

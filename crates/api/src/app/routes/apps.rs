//! App catalog routes.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;
use axum::{Json, Router, routing::get};
use serde::Deserialize;

use prepdeck_appinfo::{AppInfo, AppInfoId};
use prepdeck_core::Entity;

use crate::app::envelope;
use crate::app::errors;
use crate::app::routes::common::parse_id;
use crate::app::services::AppServices;

#[derive(Debug, Deserialize)]
pub struct AppInfoRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(register))
        .route("/:id", get(get_one).put(update))
}

/// POST /apps
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<AppInfoRequest>,
) -> Response {
    match services
        .apps
        .register(
            &body.name,
            body.description.as_deref().unwrap_or(""),
            body.icon_url,
        )
        .await
    {
        Ok(info) => envelope::created(app_to_json(&info)),
        Err(err) => errors::error_to_response(err),
    }
}

/// GET /apps
pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.apps.list().await {
        Ok(infos) => {
            let items: Vec<serde_json::Value> = infos.iter().map(app_to_json).collect();
            envelope::ok(items)
        }
        Err(err) => errors::error_to_response(err),
    }
}

/// GET /apps/:id
pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => AppInfoId::from_raw(id),
        Err(resp) => return resp,
    };

    match services.apps.get(id).await {
        Ok(info) => envelope::ok(app_to_json(&info)),
        Err(err) => errors::error_to_response(err),
    }
}

/// PUT /apps/:id - the entry must exist.
pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AppInfoRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => AppInfoId::from_raw(id),
        Err(resp) => return resp,
    };

    match services
        .apps
        .update(
            id,
            &body.name,
            body.description.as_deref().unwrap_or(""),
            body.icon_url,
        )
        .await
    {
        Ok(info) => envelope::ok_with_message("app updated", app_to_json(&info)),
        Err(err) => errors::error_to_response(err),
    }
}

fn app_to_json(info: &AppInfo) -> serde_json::Value {
    serde_json::json!({
        "id": info.id().map(|id| id.as_i64()),
        "name": info.name(),
        "description": info.description(),
        "icon_url": info.icon_url(),
        "updated_at": info.updated_at().to_rfc3339(),
    })
}

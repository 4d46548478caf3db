use axum::{Router, routing::get};

pub mod accounts;
pub mod admin;
pub mod apps;
pub mod common;
pub mod quota;
pub mod settings;
pub mod subscriptions;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/quota", get(quota::quota))
        .route("/quota/history", get(quota::history))
        .route("/config", get(settings::get_basic).put(settings::put_basic))
        .route(
            "/config/advanced",
            get(settings::get_advanced).put(settings::put_advanced),
        )
        .route("/plans", get(subscriptions::list_plans))
        .nest("/accounts", accounts::router())
        .nest("/apps", apps::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/admin", admin::router())
}

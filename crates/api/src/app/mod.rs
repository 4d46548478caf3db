//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (repositories, bus, listeners)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `envelope.rs`: the uniform response envelope
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use prepdeck_auth::Hs256TokenVerifier;
use prepdeck_infra::{DemoAppInitializer, InitializerRegistry, PlanInitializer};

use crate::config::ApiConfig;
use crate::middleware;

pub mod envelope;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Under the `dev` profile the seed-data initializers run before the router
/// is returned.
pub async fn build_app(config: ApiConfig) -> Router {
    let services = Arc::new(build_wired_services(&config).await);

    if config.is_dev() {
        let mut registry = InitializerRegistry::new();
        registry.register(Arc::new(PlanInitializer));
        registry.register(Arc::new(DemoAppInitializer));
        let report = registry.run_all(&services.seed_ctx).await;
        if !report.failed.is_empty() {
            tracing::warn!(failed = ?report.failed, "some initializers failed at startup");
        }
    }

    let verifier = Arc::new(Hs256TokenVerifier::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { verifier };

    // Protected routes: require a verified bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let api = Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected);

    Router::new().nest("/api", api).layer(ServiceBuilder::new())
}

async fn build_wired_services(config: &ApiConfig) -> services::AppServices {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        match services::build_postgres_services(url).await {
            Ok(wired) => return wired,
            Err(err) => {
                tracing::error!(error = %err, "postgres wiring failed; falling back to in-memory");
            }
        }
    }

    let _ = config;
    services::build_services()
}

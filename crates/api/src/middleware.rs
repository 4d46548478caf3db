//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use prepdeck_auth::TokenVerifier;

use crate::app::envelope;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(response) => return response,
    };

    let claims = match state.verifier.verify(token, Utc::now()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            return unauthorized();
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(
        claims.sub,
        claims.email,
        claims.role,
    ));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let header = header.to_str().map_err(|_| unauthorized())?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}

fn unauthorized() -> Response {
    envelope::error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "missing or invalid bearer token",
    )
}

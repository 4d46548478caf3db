//! Uniform JSON response envelope.
//!
//! Every endpoint answers `{ success, message, data, error }`; `data` is
//! populated on success, `error` carries a machine-readable code otherwise.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

/// 200 with data.
pub fn ok<T: Serialize>(data: T) -> Response {
    ok_with_message("ok", data)
}

/// 200 with a custom message.
pub fn ok_with_message<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// 201 with data.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: "created".to_string(),
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

/// Error envelope with the given status.
pub fn error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let message = message.into();
    (
        status,
        Json(ApiResponse::<serde_json::Value> {
            success: false,
            message: message.clone(),
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message,
            }),
        }),
    )
        .into_response()
}

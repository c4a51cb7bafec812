//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forge_core::ForgeError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthorized",
            message: message.into(),
        }
    }
}

impl From<ForgeError> for ApiError {
    fn from(e: ForgeError) -> Self {
        match e {
            ForgeError::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                code: "validation_failed",
                message,
            },
            other => {
                tracing::error!("Request failed: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "storage_failed",
                    message: "The record store could not complete the request".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code
        }));
        (self.status, body).into_response()
    }
}

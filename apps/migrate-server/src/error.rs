//! Error types for the migration server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::Issue;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request")]
    Validation { issues: Vec<Issue> },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Attach the request's correlation id for the response body
    pub fn with_request_id(self, request_id: impl Into<String>) -> ApiError {
        ApiError {
            request_id: request_id.into(),
            error: self,
        }
    }
}

/// A [`ServerError`] bound to the request it failed
#[derive(Debug)]
pub struct ApiError {
    pub request_id: String,
    pub error: ServerError,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    request_id: String,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self.error {
            ServerError::Validation { issues } => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                self.error.to_string(),
                serde_json::to_value(issues).ok(),
            ),
            ServerError::MalformedBody(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Malformed request body".to_string(),
                Some(serde_json::Value::String(msg.clone())),
            ),
            ServerError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.error.to_string(),
                None,
            ),
            ServerError::Internal(msg) => {
                tracing::error!(request_id = %self.request_id, "Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Unexpected error".to_string(),
                    None,
                )
            }
        };

        tracing::debug!(
            request_id = %self.request_id,
            status = status.as_u16(),
            code,
            "request failed"
        );

        let body = ErrorResponse {
            request_id: self.request_id,
            error: ErrorBody {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

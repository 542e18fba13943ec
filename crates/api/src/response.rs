//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard API response envelope.
///
/// Successful responses carry `success: true` and either a `message` or `data`.
/// Errors are rendered by `AppError` with the same envelope shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a `200 OK` response carrying data.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Returns the status code this response will be sent with.
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl ApiResponse<()> {
    /// Create a success response carrying only a message.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

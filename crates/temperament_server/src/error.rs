//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use temperament_core::{FieldError, TemperamentError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// Handler error. Wraps the core error so `?` works in handlers.
#[derive(Debug)]
pub struct AppError(pub TemperamentError);

impl From<TemperamentError> for AppError {
    fn from(e: TemperamentError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
        } else {
            tracing::debug!(code = self.0.code(), error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.code(),
            message: self.0.to_string(),
            fields: self.0.fields().to_vec(),
        };
        (status, Json(body)).into_response()
    }
}

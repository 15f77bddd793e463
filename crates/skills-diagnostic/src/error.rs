use crate::config::ConfigError;
use crate::diagnostic::{DiagnosticServiceError, SchemaError, SchemaLoadError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("questionnaire error: {0}")]
    Schema(#[from] SchemaError),
    #[error("questionnaire error: {0}")]
    SchemaLoad(#[from] SchemaLoadError),
    #[error("diagnostic error: {0}")]
    Diagnostic(#[from] DiagnosticServiceError),
    #[error("invalid input: {0}")]
    Input(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Diagnostic(_) | AppError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Schema(_)
            | AppError::SchemaLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::info;

use super::service::{AnswerSubmission, DiagnosticService};
use super::views::ReportStatus;

/// Router builder exposing the questionnaire and the evaluation endpoint.
pub fn diagnostic_router(service: Arc<DiagnosticService>) -> Router {
    Router::new()
        .route(
            "/api/v1/diagnostic/questionnaire",
            get(questionnaire_handler),
        )
        .route("/api/v1/diagnostic/evaluate", post(evaluate_handler))
        .with_state(service)
}

pub(crate) async fn questionnaire_handler(
    State(service): State<Arc<DiagnosticService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.questionnaire())).into_response()
}

pub(crate) async fn evaluate_handler(
    State(service): State<Arc<DiagnosticService>>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response {
    match service.evaluate(submission) {
        Ok(report) => {
            let outcome = match report.status {
                ReportStatus::Recommended => "recommended",
                ReportStatus::NoEligibleProgramme => "no_eligible_programme",
            };
            info!(outcome, "diagnostic evaluated");
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

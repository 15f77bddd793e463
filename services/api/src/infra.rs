use metrics_exporter_prometheus::PrometheusHandle;
use skills_diagnostic::config::DiagnosticConfig;
use skills_diagnostic::diagnostic::{DiagnosticEngine, QuestionId, SchemaLoader, SubmittedAnswer};
use skills_diagnostic::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine for the configured questionnaire, or the built-in one when no file is set.
pub(crate) fn load_engine(
    config: &DiagnosticConfig,
    override_path: Option<&Path>,
) -> Result<DiagnosticEngine, AppError> {
    match override_path.or(config.schema_path.as_deref()) {
        Some(path) => {
            let schema = SchemaLoader::from_path(path)?;
            Ok(DiagnosticEngine::from_schema(Arc::new(schema)))
        }
        None => {
            info!("using built-in questionnaire");
            Ok(DiagnosticEngine::standard()?)
        }
    }
}

/// Parses `--answer 3=digital,green` into a submitted answer. An empty value
/// list (`--answer 6=`) records an explicit skip.
pub(crate) fn parse_answer(raw: &str) -> Result<SubmittedAnswer, String> {
    let (id, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=VALUE[,VALUE], got '{raw}'"))?;
    let id = id
        .trim()
        .trim_start_matches('q')
        .parse::<u16>()
        .map_err(|err| format!("failed to parse question id in '{raw}' ({err})"))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();

    Ok(SubmittedAnswer {
        question_id: QuestionId(id),
        values,
    })
}

use crate::infra::load_engine;
use clap::Args;
use skills_diagnostic::config::AppConfig;
use skills_diagnostic::diagnostic::{
    Advance, AnswerSubmission, DiagnosticEngine, DiagnosticReport, DiagnosticService,
    DiagnosticServiceError, QuestionnaireView, ReportStatus, Session, SubmittedAnswer,
};
use skills_diagnostic::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Questionnaire JSON to inspect instead of APP_DIAGNOSTIC_SCHEMA or the built-in one
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Answer as QUESTION=VALUE[,VALUE]; repeat once per question
    #[arg(long = "answer", value_parser = crate::infra::parse_answer, required = true)]
    pub(crate) answers: Vec<SubmittedAnswer>,
    /// Questionnaire JSON to score against instead of APP_DIAGNOSTIC_SCHEMA or the built-in one
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the walkthrough that ends without an eligible programme.
    #[arg(long)]
    pub(crate) skip_fallback: bool,
}

fn configured_engine(schema: Option<PathBuf>) -> Result<DiagnosticEngine, AppError> {
    let config = AppConfig::load()?;
    load_engine(&config.diagnostic, schema.as_deref())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let service = DiagnosticService::new(configured_engine(args.schema)?);
    render_questionnaire(&service.questionnaire());
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        answers,
        schema,
        json,
    } = args;

    let service = DiagnosticService::new(configured_engine(schema)?);
    let report = service.evaluate(AnswerSubmission { answers })?;

    if json {
        let payload = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Input(format!("report could not be rendered: {err}")))?;
        println!("{payload}");
    } else {
        render_report(&report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = DiagnosticEngine::standard()?;

    println!("Skills Diagnostic demo");
    println!("\nWalkthrough 1: small business upskilling in the region");
    let mut session = engine.create_session();
    answer(&mut session, &["in_region"])?;
    answer(&mut session, &["micro"])?;
    println!("  ...going back to correct the company size");
    session.retreat().map_err(DiagnosticServiceError::from)?;
    answer(&mut session, &["small"])?;
    answer(&mut session, &["digital", "green"])?;
    answer(&mut session, &["upskill"])?;
    answer(&mut session, &["immediately"])?;
    answer(&mut session, &["co_invest"])?;
    render_completed(&engine, &session);

    if args.skip_fallback {
        return Ok(());
    }

    println!("\nWalkthrough 2: micro business outside the region");
    session.reset();
    answer(&mut session, &["outside_region"])?;
    answer(&mut session, &["micro"])?;
    answer(&mut session, &["digital"])?;
    answer(&mut session, &["retrain"])?;
    answer(&mut session, &["immediately"])?;
    answer(&mut session, &[])?;
    render_completed(&engine, &session);

    Ok(())
}

fn answer(session: &mut Session, values: &[&str]) -> Result<(), AppError> {
    let question = session.current_question().clone();
    for value in values {
        session
            .select_option(value)
            .map_err(DiagnosticServiceError::from)?;
    }
    let step = session.advance().map_err(DiagnosticServiceError::from)?;

    let picked = if values.is_empty() {
        "(skipped)".to_string()
    } else {
        values.join(", ")
    };
    println!("- {} {} -> {}", question.id, question.prompt, picked);
    let running: Vec<String> = session
        .schema()
        .categories()
        .iter()
        .zip(session.scores().values())
        .map(|(category, score)| format!("{}={}", category.id, score))
        .collect();
    println!("  running scores: {}", running.join(" | "));
    if let Advance::Completed(_) = step {
        println!("  questionnaire complete");
    }
    Ok(())
}

fn render_completed(engine: &DiagnosticEngine, session: &Session) {
    match session.result() {
        Some(result) => render_report(&DiagnosticReport::new(engine.schema(), result)),
        None => println!("  Diagnostic still in progress"),
    }
}

pub(crate) fn render_questionnaire(view: &QuestionnaireView) {
    println!("Skills Diagnostic questionnaire");
    for question in &view.questions {
        let mode = match (question.allow_multiple, question.required) {
            (true, true) => "choose one or more",
            (true, false) => "choose any, optional",
            (false, true) => "choose one",
            (false, false) => "choose one, optional",
        };
        println!("\n{} {} [{}]", question.id, question.prompt, mode);
        if let Some(help) = &question.help_text {
            println!("  {help}");
        }
        for option in &question.options {
            println!("  - {} ({})", option.label, option.value);
        }
    }

    println!("\nProgrammes");
    for programme in &view.programmes {
        println!(
            "- {} ({}): {}",
            programme.title, programme.id, programme.description
        );
    }
}

pub(crate) fn render_report(report: &DiagnosticReport) {
    match report.status {
        ReportStatus::Recommended => println!("\nRecommendation"),
        ReportStatus::NoEligibleProgramme => println!("\nNo programme met its threshold"),
    }

    if let Some(top) = &report.top {
        println!(
            "- Top match: {} (score {} / threshold {})",
            top.title, top.score, top.threshold
        );
        println!("  Funding: {}", top.funding);
        for criterion in &top.eligibility_criteria {
            println!("  * {criterion}");
        }
        println!("  Next step: {}", top.call_to_action);
    }
    if !report.secondary.is_empty() {
        println!("- Also worth exploring:");
        for programme in &report.secondary {
            println!(
                "  - {} (score {} / threshold {})",
                programme.title, programme.score, programme.threshold
            );
        }
    }
    if let Some(fallback) = &report.fallback {
        println!("- {}", fallback.message);
        println!("  Next step: {}", fallback.call_to_action);
    }
    if let Some(closest) = &report.closest {
        println!(
            "- Closest programme: {} (score {} / threshold {})",
            closest.title, closest.score, closest.threshold
        );
    }

    println!("Scores:");
    for outcome in &report.scores {
        let standing = if outcome.excluded {
            "excluded"
        } else if outcome.eligible {
            "eligible"
        } else {
            "below threshold"
        };
        println!(
            "  - {}: raw {} | adjusted {} | threshold {} | {}",
            outcome.category, outcome.raw_score, outcome.adjusted_score, outcome.threshold, standing
        );
    }
    if !report.adjustments.is_empty() {
        println!("Adjustments:");
        for applied in &report.adjustments {
            println!("  - {}", applied.summary());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::parse_answer;

    #[test]
    fn demo_walkthroughs_complete() {
        run_demo(DemoArgs::default()).expect("demo runs to completion");
    }

    #[test]
    fn cli_answers_feed_the_service() {
        let answers = [
            "1=in_region",
            "2=large",
            "3=leadership",
            "4=inspire_young_people",
            "5=exploring",
            "6=fully_funded",
        ]
        .into_iter()
        .map(parse_answer)
        .collect::<Result<Vec<_>, _>>()
        .expect("answers parse");
        let service = DiagnosticService::new(DiagnosticEngine::standard().expect("valid"));

        let report = service
            .evaluate(AnswerSubmission { answers })
            .expect("evaluation succeeds");

        assert_eq!(report.status, ReportStatus::Recommended);
        assert_eq!(
            report.top.map(|top| top.id.as_str().to_string()),
            Some("careers_hub".to_string())
        );
    }
}

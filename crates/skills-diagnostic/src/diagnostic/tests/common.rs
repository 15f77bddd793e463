use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::diagnostic::adjustment::AdjustmentRule;
use crate::diagnostic::context::{ContextFlag, OrganisationSize, RegionStatus};
use crate::diagnostic::ranking::DiagnosticResult;
use crate::diagnostic::schema::{
    AnswerOption, Category, CategoryId, FallbackGuidance, Question, QuestionId, Schema,
    SchemaDefinition,
};
use crate::diagnostic::service::{AnswerSubmission, DiagnosticService, SubmittedAnswer};
use crate::diagnostic::session::{Advance, DiagnosticEngine, Session, ValidationError};

pub(crate) fn category_a() -> CategoryId {
    CategoryId::new("a")
}

pub(crate) fn category_b() -> CategoryId {
    CategoryId::new("b")
}

pub(crate) fn selection(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn option(value: &str, deltas: &[(&str, i32)], context: Option<ContextFlag>) -> AnswerOption {
    AnswerOption {
        label: value.replace('_', " "),
        value: value.to_string(),
        score_contribution: deltas
            .iter()
            .map(|(id, delta)| (CategoryId::new(*id), *delta))
            .collect::<BTreeMap<_, _>>(),
        context,
    }
}

fn category(id: &str, threshold: i32) -> Category {
    Category {
        id: CategoryId::new(id),
        title: format!("Programme {}", id.to_uppercase()),
        description: format!("Test programme {id}"),
        threshold: Some(threshold),
        eligibility_criteria: vec![format!("Criterion for {id}")],
        funding: "Fully funded".to_string(),
        call_to_action: format!("Apply for {id}"),
    }
}

/// Two programmes, four questions:
/// 1. required single-select that drives the main signal,
/// 2. optional multi-select,
/// 3. required region question (outside excludes `b`),
/// 4. optional size question (large: `a` +5, micro: `b` +3).
pub(crate) fn scenario_definition() -> SchemaDefinition {
    SchemaDefinition {
        questions: vec![
            Question {
                id: QuestionId(1),
                prompt: "Main route".to_string(),
                help_text: None,
                options: vec![
                    option("x", &[("a", 15), ("b", 2)], None),
                    option("y", &[("a", 2), ("b", 15)], None),
                    option("z", &[("a", 1), ("b", 1)], None),
                ],
                allow_multiple: false,
                required: true,
            },
            Question {
                id: QuestionId(2),
                prompt: "Skills".to_string(),
                help_text: None,
                options: vec![
                    option("digital", &[("a", 2), ("b", 3)], None),
                    option("green", &[("a", 3), ("b", 4)], None),
                    option("leadership", &[("a", 4), ("b", -4)], None),
                ],
                allow_multiple: true,
                required: false,
            },
            Question {
                id: QuestionId(3),
                prompt: "Location".to_string(),
                help_text: None,
                options: vec![
                    option(
                        "in_region",
                        &[],
                        Some(ContextFlag::Region(RegionStatus::InRegion)),
                    ),
                    option(
                        "outside_region",
                        &[],
                        Some(ContextFlag::Region(RegionStatus::OutsideRegion)),
                    ),
                ],
                allow_multiple: false,
                required: true,
            },
            Question {
                id: QuestionId(4),
                prompt: "Size".to_string(),
                help_text: None,
                options: vec![
                    option(
                        "micro",
                        &[],
                        Some(ContextFlag::OrganisationSize(OrganisationSize::Micro)),
                    ),
                    option(
                        "large",
                        &[],
                        Some(ContextFlag::OrganisationSize(OrganisationSize::Large)),
                    ),
                ],
                allow_multiple: false,
                required: false,
            },
        ],
        categories: vec![category("a", 10), category("b", 10)],
        adjustments: vec![
            AdjustmentRule::HardExclusion {
                when: ContextFlag::Region(RegionStatus::OutsideRegion),
                categories: vec![category_b()],
            },
            AdjustmentRule::SoftWeighting {
                when: ContextFlag::OrganisationSize(OrganisationSize::Large),
                category: category_a(),
                delta: 5,
            },
            AdjustmentRule::SoftWeighting {
                when: ContextFlag::OrganisationSize(OrganisationSize::Micro),
                category: category_b(),
                delta: 3,
            },
        ],
        fallback: FallbackGuidance::default(),
    }
}

pub(crate) fn scenario_schema() -> Schema {
    Schema::new(scenario_definition()).expect("scenario schema is valid")
}

pub(crate) fn scenario_engine() -> DiagnosticEngine {
    DiagnosticEngine::new(scenario_definition()).expect("scenario schema is valid")
}

/// One required single-select question over programmes `A` and `B`, both at threshold 10.
pub(crate) fn single_question_engine() -> DiagnosticEngine {
    let definition = SchemaDefinition {
        questions: vec![Question {
            id: QuestionId(1),
            prompt: "Which fits best?".to_string(),
            help_text: None,
            options: vec![
                option("x", &[("A", 15), ("B", 2)], None),
                option("y", &[("A", 2), ("B", 15)], None),
                option("z", &[("A", 1), ("B", 1)], None),
            ],
            allow_multiple: false,
            required: true,
        }],
        categories: vec![category("A", 10), category("B", 10)],
        adjustments: Vec::new(),
        fallback: FallbackGuidance::default(),
    };
    DiagnosticEngine::new(definition).expect("single question schema is valid")
}

/// Answer each question in turn with the given values and advance.
pub(crate) fn run_script(
    session: &mut Session,
    script: &[&[&str]],
) -> Result<Option<DiagnosticResult>, ValidationError> {
    for values in script {
        for value in *values {
            session.select_option(value)?;
        }
        if let Advance::Completed(result) = session.advance()? {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

pub(crate) fn standard_service() -> DiagnosticService {
    DiagnosticService::new(DiagnosticEngine::standard().expect("standard schema is valid"))
}

pub(crate) fn submission(answers: &[(u16, &[&str])]) -> AnswerSubmission {
    AnswerSubmission {
        answers: answers
            .iter()
            .map(|(id, values)| SubmittedAnswer {
                question_id: QuestionId(*id),
                values: values.iter().map(|value| value.to_string()).collect(),
            })
            .collect(),
    }
}

/// In-region small business upskilling on digital and green skills.
pub(crate) fn small_business_submission() -> AnswerSubmission {
    submission(&[
        (1, &["in_region"]),
        (2, &["small"]),
        (3, &["digital", "green"]),
        (4, &["upskill"]),
        (5, &["immediately"]),
        (6, &["co_invest"]),
    ])
}

pub(crate) fn shared_service() -> Arc<DiagnosticService> {
    Arc::new(standard_service())
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

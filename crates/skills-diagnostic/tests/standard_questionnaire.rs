use std::io::Cursor;

use skills_diagnostic::diagnostic::{
    Advance, AnswerSubmission, DiagnosticEngine, DiagnosticReport, DiagnosticResult,
    DiagnosticService, OrganisationSize, Outcome, QuestionId, RegionStatus, ReportStatus,
    SchemaLoader, Session, SubmittedAnswer, APPRENTICESHIPS, REGIONAL_SKILLS_FUND,
    SKILLS_BOOTCAMPS,
};

fn answer(session: &mut Session, values: &[&str]) -> Option<DiagnosticResult> {
    for value in values {
        session.select_option(value).expect("option exists");
    }
    match session.advance().expect("answer accepted") {
        Advance::Next { .. } => None,
        Advance::Completed(result) => Some(result),
    }
}

#[test]
fn standard_questionnaire_covers_every_programme() {
    let engine = DiagnosticEngine::standard().expect("standard questionnaire is valid");
    let schema = engine.schema();

    assert_eq!(schema.question_count(), 6);
    let programmes: Vec<&str> = schema
        .categories()
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    assert_eq!(
        programmes,
        vec![
            "apprenticeships",
            "skills_bootcamps",
            "regional_skills_fund",
            "careers_hub",
            "adult_skills"
        ]
    );
    for category in schema.categories() {
        assert!(category.threshold.is_some_and(|threshold| threshold > 0));
        assert!(!category.call_to_action.is_empty());
    }
    let skills = schema
        .question_at(schema.question_position(QuestionId(3)).expect("question 3"))
        .expect("question 3");
    assert!(skills.allow_multiple);
}

#[test]
fn changing_company_size_mid_run_is_scored_once() {
    let engine = DiagnosticEngine::standard().expect("standard questionnaire is valid");
    let mut session = engine.create_session();

    answer(&mut session, &["in_region"]);
    answer(&mut session, &["micro"]);
    session.retreat().expect("back to company size");
    assert_eq!(
        session.context().organisation_size,
        Some(OrganisationSize::Micro)
    );
    answer(&mut session, &["small"]);
    assert_eq!(
        session.context().organisation_size,
        Some(OrganisationSize::Small)
    );
    answer(&mut session, &["digital", "green"]);
    answer(&mut session, &["upskill"]);
    answer(&mut session, &["immediately"]);
    let result = answer(&mut session, &["co_invest"]).expect("completed");

    assert_eq!(session.context().region, Some(RegionStatus::InRegion));
    match result.outcome() {
        Outcome::Recommended { top, secondary } => {
            assert_eq!(top.as_str(), REGIONAL_SKILLS_FUND);
            let secondary: Vec<&str> = secondary.iter().map(|id| id.as_str()).collect();
            assert_eq!(secondary, vec![SKILLS_BOOTCAMPS]);
        }
        other => panic!("expected a recommendation, got {other:?}"),
    }
    let fund = result
        .categories()
        .iter()
        .find(|outcome| outcome.category.as_str() == REGIONAL_SKILLS_FUND)
        .expect("fund scored");
    assert_eq!(fund.raw_score, 19);
    assert_eq!(fund.adjusted_score, 22);
}

#[test]
fn medium_recruiter_is_steered_to_apprenticeships() {
    let service = DiagnosticService::new(
        DiagnosticEngine::standard().expect("standard questionnaire is valid"),
    );
    let submission = AnswerSubmission {
        answers: [
            (1, "in_region"),
            (2, "medium"),
            (3, "technical"),
            (4, "recruit"),
            (5, "within_year"),
            (6, "levy_payer"),
        ]
        .into_iter()
        .map(|(id, value)| SubmittedAnswer {
            question_id: QuestionId(id),
            values: vec![value.to_string()],
        })
        .collect(),
    };

    let report: DiagnosticReport = service.evaluate(submission).expect("evaluation succeeds");

    assert_eq!(report.status, ReportStatus::Recommended);
    let top = report.top.expect("top recommendation");
    assert_eq!(top.id.as_str(), APPRENTICESHIPS);
    assert_eq!(top.score, 22);
    assert!(report.secondary.is_empty());
    assert!(report
        .adjustments
        .iter()
        .any(|applied| applied.summary().contains("apprenticeships")));
}

#[test]
fn authored_questionnaire_loads_from_json() {
    let json = r#"{
        "questions": [
            {
                "id": 1,
                "prompt": "Where are you based?",
                "required": true,
                "options": [
                    {
                        "label": "Here",
                        "value": "here",
                        "score_contribution": { "local": 12 },
                        "context": { "kind": "region", "value": "in_region" }
                    },
                    {
                        "label": "Elsewhere",
                        "value": "elsewhere",
                        "score_contribution": { "local": 12 },
                        "context": { "kind": "region", "value": "outside_region" }
                    }
                ]
            }
        ],
        "categories": [
            { "id": "local", "title": "Local grant", "description": "Grant", "threshold": 10 }
        ],
        "adjustments": [
            {
                "rule": "hard_exclusion",
                "when": { "kind": "region", "value": "outside_region" },
                "categories": ["local"]
            }
        ]
    }"#;

    let schema = SchemaLoader::from_reader(Cursor::new(json)).expect("questionnaire loads");
    let engine = DiagnosticEngine::from_schema(schema.into());

    let mut session = engine.create_session();
    let result = answer(&mut session, &["here"]).expect("completed");
    assert_eq!(result.top().map(|id| id.as_str()), Some("local"));

    session.reset();
    let result = answer(&mut session, &["elsewhere"]).expect("completed");
    assert!(result.eligible().is_empty());
    assert_eq!(result.closest(), None);
}

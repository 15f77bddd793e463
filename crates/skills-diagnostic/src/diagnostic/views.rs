use serde::Serialize;

use super::adjustment::AppliedAdjustment;
use super::ranking::{CategoryOutcome, DiagnosticResult, Outcome};
use super::schema::{Category, CategoryId, FallbackGuidance, Question, QuestionId, Schema};

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub allow_multiple: bool,
    pub required: bool,
    pub options: Vec<OptionView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt.clone(),
            help_text: question.help_text.clone(),
            allow_multiple: question.allow_multiple,
            required: question.required,
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    label: option.label.clone(),
                    value: option.value.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgrammeSummaryView {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
}

/// Display-only projection of a questionnaire; scoring data stays server side.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireView {
    pub questions: Vec<QuestionView>,
    pub programmes: Vec<ProgrammeSummaryView>,
}

impl From<&Schema> for QuestionnaireView {
    fn from(schema: &Schema) -> Self {
        Self {
            questions: schema.questions().iter().map(QuestionView::from).collect(),
            programmes: schema
                .categories()
                .iter()
                .map(|category| ProgrammeSummaryView {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    description: category.description.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    pub eligibility_criteria: Vec<String>,
    pub funding: String,
    pub call_to_action: String,
    pub score: i32,
    pub threshold: i32,
}

impl RecommendationView {
    fn new(category: &Category, outcome: &CategoryOutcome) -> Self {
        Self {
            id: category.id.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            eligibility_criteria: category.eligibility_criteria.clone(),
            funding: category.funding.clone(),
            call_to_action: category.call_to_action.clone(),
            score: outcome.adjusted_score,
            threshold: outcome.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Recommended,
    NoEligibleProgramme,
}

/// Result enriched with the display data the portal renders.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<RecommendationView>,
    pub secondary: Vec<RecommendationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest: Option<RecommendationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackGuidance>,
    pub scores: Vec<CategoryOutcome>,
    pub adjustments: Vec<AppliedAdjustment>,
}

impl DiagnosticReport {
    pub fn new(schema: &Schema, result: &DiagnosticResult) -> Self {
        let view = |id: &CategoryId| -> Option<RecommendationView> {
            let category = schema.category(id)?;
            let outcome = result.category(id)?;
            Some(RecommendationView::new(category, outcome))
        };

        let (status, top, secondary, closest, fallback) = match result.outcome() {
            Outcome::Recommended { top, secondary } => (
                ReportStatus::Recommended,
                view(top),
                secondary
                    .iter()
                    .filter_map(|id| view(id))
                    .collect::<Vec<_>>(),
                None,
                None,
            ),
            Outcome::NoEligibleCategory { closest } => (
                ReportStatus::NoEligibleProgramme,
                None,
                Vec::new(),
                closest.and_then(|id| view(id)),
                Some(schema.fallback().clone()),
            ),
        };

        Self {
            status,
            top,
            secondary,
            closest,
            fallback,
            scores: result.categories().to_vec(),
            adjustments: result.adjustments().to_vec(),
        }
    }
}

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::adjustment::AdjustmentRule;
use super::context::ContextFlag;
use super::scoring::ScoreCard;

/// Stable identity of a question within a questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u16);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Stable identity of a support programme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable answer. `value` is unique within its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub score_contribution: BTreeMap<CategoryId, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextFlag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// A support programme the diagnostic can recommend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    /// Optional only in authored data; `Schema::new` rejects a category without one.
    #[serde(default)]
    pub threshold: Option<i32>,
    #[serde(default)]
    pub eligibility_criteria: Vec<String>,
    #[serde(default)]
    pub funding: String,
    #[serde(default)]
    pub call_to_action: String,
}

const DEFAULT_FALLBACK_MESSAGE: &str = "None of our funded programmes is a clear fit yet, \
    but a skills adviser can help you plan next steps.";

/// Guidance offered when no programme qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackGuidance {
    pub message: String,
    pub call_to_action: String,
}

impl Default for FallbackGuidance {
    fn default() -> Self {
        Self {
            message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            call_to_action: "Book a free call with a skills adviser".to_string(),
        }
    }
}

/// Authored form of a questionnaire, as written by content editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub questions: Vec<Question>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentRule>,
    #[serde(default)]
    pub fallback: FallbackGuidance,
}

/// Structural problems in an authored questionnaire. These indicate a bad
/// deployment and are raised before any session starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("questionnaire declares no questions")]
    NoQuestions,
    #[error("questionnaire declares no programmes")]
    NoCategories,
    #[error("question {0} is declared more than once")]
    DuplicateQuestion(QuestionId),
    #[error("programme '{0}' is declared more than once")]
    DuplicateCategory(CategoryId),
    #[error("question {0} has no options")]
    QuestionWithoutOptions(QuestionId),
    #[error("question {question} declares option '{value}' more than once")]
    DuplicateOption { question: QuestionId, value: String },
    #[error("option '{value}' of question {question} scores unknown programme '{category}'")]
    UnknownCategory {
        question: QuestionId,
        value: String,
        category: CategoryId,
    },
    #[error("programme '{0}' has no eligibility threshold")]
    MissingThreshold(CategoryId),
    #[error("adjustment rule references unknown programme '{0}'")]
    UnknownAdjustmentCategory(CategoryId),
    #[error("programme '{0}' could accumulate a score outside the supported range")]
    ContributionOutOfRange(CategoryId),
}

/// Validated questionnaire. Every option's contribution is resolved to a dense
/// vector over all programmes in declaration order, with absent entries as zero.
#[derive(Debug, Clone)]
pub struct Schema {
    questions: Vec<Question>,
    categories: Vec<Category>,
    thresholds: Vec<i32>,
    contributions: Vec<Vec<ScoreCard>>,
    adjustments: Vec<AdjustmentRule>,
    fallback: FallbackGuidance,
}

impl Schema {
    pub fn new(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let SchemaDefinition {
            questions,
            categories,
            adjustments,
            fallback,
        } = definition;

        if questions.is_empty() {
            return Err(SchemaError::NoQuestions);
        }
        if categories.is_empty() {
            return Err(SchemaError::NoCategories);
        }

        let mut index: BTreeMap<&CategoryId, usize> = BTreeMap::new();
        let mut thresholds = Vec::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            if index.insert(&category.id, position).is_some() {
                return Err(SchemaError::DuplicateCategory(category.id.clone()));
            }
            let threshold = category
                .threshold
                .ok_or_else(|| SchemaError::MissingThreshold(category.id.clone()))?;
            thresholds.push(threshold);
        }

        // Worst-case magnitude each programme can reach from answers and weightings.
        let mut reach = vec![0_i64; categories.len()];
        let mut seen_questions = HashSet::new();
        let mut contributions = Vec::with_capacity(questions.len());
        for question in &questions {
            if !seen_questions.insert(question.id) {
                return Err(SchemaError::DuplicateQuestion(question.id));
            }
            if question.options.is_empty() {
                return Err(SchemaError::QuestionWithoutOptions(question.id));
            }

            let mut seen_values = HashSet::new();
            let mut resolved = Vec::with_capacity(question.options.len());
            for option in &question.options {
                if !seen_values.insert(option.value.as_str()) {
                    return Err(SchemaError::DuplicateOption {
                        question: question.id,
                        value: option.value.clone(),
                    });
                }

                let mut dense = vec![0; categories.len()];
                for (category, delta) in &option.score_contribution {
                    let position = index
                        .get(category)
                        .copied()
                        .ok_or_else(|| SchemaError::UnknownCategory {
                            question: question.id,
                            value: option.value.clone(),
                            category: category.clone(),
                        })?;
                    dense[position] = *delta;
                }
                for (total, delta) in reach.iter_mut().zip(&dense) {
                    *total = total.saturating_add(magnitude(*delta));
                }
                resolved.push(ScoreCard::from_values(dense));
            }
            contributions.push(resolved);
        }

        for rule in &adjustments {
            if let Some(unknown) = rule
                .categories()
                .into_iter()
                .find(|category| !index.contains_key(category))
            {
                return Err(SchemaError::UnknownAdjustmentCategory(unknown.clone()));
            }
            if let AdjustmentRule::SoftWeighting {
                category, delta, ..
            } = rule
            {
                if let Some(&position) = index.get(category) {
                    reach[position] = reach[position].saturating_add(magnitude(*delta));
                }
            }
        }

        if let Some(position) = reach.iter().position(|total| *total > i64::from(i32::MAX)) {
            return Err(SchemaError::ContributionOutOfRange(categories[position].id.clone()));
        }

        Ok(Self {
            questions,
            categories,
            thresholds,
            contributions,
            adjustments,
            fallback,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question_at(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    pub fn question_position(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    /// Programmes in declaration order, which is also the tie-break order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_index(&self, id: &CategoryId) -> Option<usize> {
        self.categories
            .iter()
            .position(|category| &category.id == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    pub fn threshold_at(&self, index: usize) -> Option<i32> {
        self.thresholds.get(index).copied()
    }

    pub fn threshold(&self, id: &CategoryId) -> Option<i32> {
        self.category_index(id)
            .and_then(|index| self.threshold_at(index))
    }

    /// Resolved contribution of one option of the question at `position`.
    pub fn option_contribution(&self, position: usize, option_index: usize) -> Option<&ScoreCard> {
        self.contributions
            .get(position)
            .and_then(|options| options.get(option_index))
    }

    pub fn adjustments(&self) -> &[AdjustmentRule] {
        &self.adjustments
    }

    pub fn fallback(&self) -> &FallbackGuidance {
        &self.fallback
    }

    pub fn zeroed_scores(&self) -> ScoreCard {
        ScoreCard::zeroed(self.categories.len())
    }
}

fn magnitude(delta: i32) -> i64 {
    i64::from(delta.unsigned_abs())
}

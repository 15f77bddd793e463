use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::adjustment::adjust;
use super::context::ContextFlags;
use super::ranking::{rank, DiagnosticResult};
use super::schema::{CategoryId, Question, QuestionId, Schema, SchemaDefinition, SchemaError};
use super::scoring::{self, ScoreCard};

/// Recoverable navigation failures. None of them changes session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("question {0} requires at least one selection")]
    SelectionRequired(QuestionId),
    #[error("question {question} has no option '{value}'")]
    UnknownOption { question: QuestionId, value: String },
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("the diagnostic is already complete")]
    AlreadyCompleted,
}

/// Outcome of a successful [`Session::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { position: usize },
    Completed(DiagnosticResult),
}

/// Owns a validated questionnaire and hands out independent sessions.
#[derive(Debug, Clone)]
pub struct DiagnosticEngine {
    schema: Arc<Schema>,
}

impl DiagnosticEngine {
    pub fn new(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let schema = Schema::new(definition)?;
        Ok(Self::from_schema(Arc::new(schema)))
    }

    /// Engine over the built-in Skills Diagnostic questionnaire.
    pub fn standard() -> Result<Self, SchemaError> {
        Self::new(SchemaDefinition::standard())
    }

    pub fn from_schema(schema: Arc<Schema>) -> Self {
        info!(
            questions = schema.question_count(),
            programmes = schema.categories().len(),
            rules = schema.adjustments().len(),
            "diagnostic questionnaire loaded"
        );
        Self { schema }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn create_session(&self) -> Session {
        Session::new(Arc::clone(&self.schema))
    }
}

/// One respondent's progress through the questionnaire.
#[derive(Debug, Clone)]
pub struct Session {
    schema: Arc<Schema>,
    position: usize,
    pending: BTreeSet<String>,
    answers: BTreeMap<QuestionId, BTreeSet<String>>,
    applied: BTreeMap<QuestionId, ScoreCard>,
    scores: ScoreCard,
    context: ContextFlags,
    result: Option<DiagnosticResult>,
}

impl Session {
    pub fn new(schema: Arc<Schema>) -> Self {
        let scores = schema.zeroed_scores();
        Self {
            schema,
            position: 0,
            pending: BTreeSet::new(),
            answers: BTreeMap::new(),
            applied: BTreeMap::new(),
            scores,
            context: ContextFlags::default(),
            result: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_question(&self) -> &Question {
        &self.schema.questions()[self.position]
    }

    /// Selection being edited for the current question, not yet committed.
    pub fn pending_selection(&self) -> &BTreeSet<String> {
        &self.pending
    }

    /// Committed selections per answered question.
    pub fn answers(&self) -> &BTreeMap<QuestionId, BTreeSet<String>> {
        &self.answers
    }

    pub fn scores(&self) -> &ScoreCard {
        &self.scores
    }

    pub fn score(&self, category: &CategoryId) -> Option<i32> {
        self.schema
            .category_index(category)
            .and_then(|index| self.scores.get(index))
    }

    pub fn context(&self) -> &ContextFlags {
        &self.context
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&DiagnosticResult> {
        self.result.as_ref()
    }

    /// Single-select questions replace the pending selection; multi-select toggles.
    pub fn select_option(&mut self, value: &str) -> Result<(), ValidationError> {
        self.ensure_open()?;

        let question = self.current_question();
        let (question_id, allow_multiple) = (question.id, question.allow_multiple);
        if question.option(value).is_none() {
            return Err(ValidationError::UnknownOption {
                question: question_id,
                value: value.to_string(),
            });
        }

        if allow_multiple {
            if !self.pending.remove(value) {
                self.pending.insert(value.to_string());
            }
        } else {
            self.pending.clear();
            self.pending.insert(value.to_string());
        }

        debug!(question = %question_id, value, selected = self.pending.len(), "option toggled");
        Ok(())
    }

    pub fn advance(&mut self) -> Result<Advance, ValidationError> {
        self.ensure_open()?;

        let schema = Arc::clone(&self.schema);
        let question = self.current_question();
        if question.required && self.pending.is_empty() {
            return Err(ValidationError::SelectionRequired(question.id));
        }

        self.commit(&schema);

        if self.position + 1 >= schema.question_count() {
            return Ok(Advance::Completed(self.complete(&schema)));
        }

        self.position += 1;
        self.load_pending();
        Ok(Advance::Next {
            position: self.position,
        })
    }

    /// Step back one question and restore its committed selection. Scores are
    /// left alone; the old contribution is swapped out on the next commit.
    pub fn retreat(&mut self) -> Result<(), ValidationError> {
        self.ensure_open()?;
        if self.position == 0 {
            return Err(ValidationError::AtFirstQuestion);
        }

        self.position -= 1;
        self.load_pending();
        debug!(position = self.position, "retreated");
        Ok(())
    }

    /// Discard all progress, as if freshly created on the same questionnaire.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.schema));
    }

    fn ensure_open(&self) -> Result<(), ValidationError> {
        if self.is_completed() {
            Err(ValidationError::AlreadyCompleted)
        } else {
            Ok(())
        }
    }

    fn load_pending(&mut self) {
        let id = self.current_question().id;
        self.pending = self.answers.get(&id).cloned().unwrap_or_default();
    }

    fn commit(&mut self, schema: &Schema) {
        let id = self.current_question().id;
        let selected = self.pending.clone();

        if let Some(previous) = self.applied.get(&id) {
            self.scores.retract(previous);
        }
        let contribution = scoring::contribution(schema, self.position, &selected);
        self.scores.accumulate(&contribution);
        self.applied.insert(id, contribution);
        self.answers.insert(id, selected);
        self.context = ContextFlags::derive(schema, &self.answers);

        debug!(question = %id, scores = ?self.scores.values(), "answer committed");
    }

    fn complete(&mut self, schema: &Schema) -> DiagnosticResult {
        let adjusted = adjust(schema, &self.scores, &self.context);
        let result = rank(schema, &adjusted);

        match result.top() {
            Some(top) => info!(
                top = %top,
                secondary = result.secondary().len(),
                "diagnostic complete"
            ),
            None => warn!(
                closest = ?result.closest().map(CategoryId::as_str),
                "diagnostic complete with no eligible programme"
            ),
        }

        self.result = Some(result.clone());
        result
    }
}

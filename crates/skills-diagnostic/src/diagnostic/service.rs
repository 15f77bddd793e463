use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schema::QuestionId;
use super::session::{Advance, DiagnosticEngine, ValidationError};
use super::views::{DiagnosticReport, QuestionnaireView};

/// Answers for one question as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A complete run of the questionnaire. Questions left out are treated as unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub answers: Vec<SubmittedAnswer>,
}

/// Error raised by the diagnostic service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("question {0} is not part of the questionnaire")]
    UnknownQuestion(QuestionId),
    #[error("question {0} accepts a single answer")]
    MultipleSelections(QuestionId),
    #[error("question {0} was answered more than once")]
    DuplicateAnswer(QuestionId),
}

/// Stateless facade: every evaluation runs in its own fresh session.
pub struct DiagnosticService {
    engine: DiagnosticEngine,
}

impl DiagnosticService {
    pub fn new(engine: DiagnosticEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &DiagnosticEngine {
        &self.engine
    }

    pub fn questionnaire(&self) -> QuestionnaireView {
        QuestionnaireView::from(self.engine.schema().as_ref())
    }

    /// Replay the submitted answers through a new session, in questionnaire order.
    pub fn evaluate(
        &self,
        submission: AnswerSubmission,
    ) -> Result<DiagnosticReport, DiagnosticServiceError> {
        let schema = self.engine.schema();

        let mut by_question: BTreeMap<QuestionId, BTreeSet<String>> = BTreeMap::new();
        for answer in submission.answers {
            let question = schema
                .question_position(answer.question_id)
                .and_then(|position| schema.question_at(position))
                .ok_or(DiagnosticServiceError::UnknownQuestion(answer.question_id))?;

            let values: BTreeSet<String> = answer.values.into_iter().collect();
            if !question.allow_multiple && values.len() > 1 {
                return Err(DiagnosticServiceError::MultipleSelections(question.id));
            }
            if by_question.insert(question.id, values).is_some() {
                return Err(DiagnosticServiceError::DuplicateAnswer(question.id));
            }
        }

        let mut session = self.engine.create_session();
        loop {
            let question_id = session.current_question().id;
            if let Some(values) = by_question.get(&question_id) {
                for value in values {
                    session.select_option(value)?;
                }
            }

            match session.advance()? {
                Advance::Next { position } => {
                    debug!(question = %question_id, next = position, "submitted answer replayed");
                }
                Advance::Completed(result) => {
                    return Ok(DiagnosticReport::new(schema, &result));
                }
            }
        }
    }
}

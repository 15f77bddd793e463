//! Skills Diagnostic engine.
//!
//! Data flows leaf-first: the [`schema`] is authored once, a [`session`] walks a
//! respondent through it while [`scoring`] keeps running totals, and on
//! completion [`adjustment`] and [`ranking`] turn those totals into a result.

pub mod adjustment;
mod catalog;
pub mod context;
pub mod loader;
pub mod ranking;
pub mod router;
pub mod schema;
pub mod scoring;
pub mod service;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use adjustment::{
    adjust, AdjustedScore, AdjustedScores, AdjustmentEffect, AdjustmentRule, AppliedAdjustment,
};
pub use catalog::{
    ADULT_SKILLS, APPRENTICESHIPS, CAREERS_HUB, REGIONAL_SKILLS_FUND, SKILLS_BOOTCAMPS,
};
pub use context::{ContextFlag, ContextFlags, OrganisationSize, RegionStatus};
pub use loader::{SchemaLoadError, SchemaLoader};
pub use ranking::{rank, CategoryOutcome, DiagnosticResult, Outcome};
pub use router::diagnostic_router;
pub use schema::{
    AnswerOption, Category, CategoryId, FallbackGuidance, Question, QuestionId, Schema,
    SchemaDefinition, SchemaError,
};
pub use scoring::ScoreCard;
pub use service::{AnswerSubmission, DiagnosticService, DiagnosticServiceError, SubmittedAnswer};
pub use session::{Advance, DiagnosticEngine, Session, ValidationError};
pub use views::{DiagnosticReport, QuestionnaireView, RecommendationView, ReportStatus};

//! Skills Diagnostic: the recommendation engine behind the regional skills portal.
//!
//! A respondent answers a short questionnaire, each answer nudges a set of
//! competing support programmes, and once the last question is accepted the
//! engine applies contextual rules and eligibility thresholds to pick one top
//! programme plus any secondary matches.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod telemetry;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::schema::{QuestionId, Schema};

/// Whether the respondent sits inside the region served by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    InRegion,
    OutsideRegion,
}

impl RegionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InRegion => "inside the served region",
            Self::OutsideRegion => "outside the served region",
        }
    }
}

/// Headcount band of the respondent's organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganisationSize {
    Micro,
    Small,
    Medium,
    Large,
}

impl OrganisationSize {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Micro => "micro (1-9 staff)",
            Self::Small => "small (10-49 staff)",
            Self::Medium => "medium (50-249 staff)",
            Self::Large => "large (250+ staff)",
        }
    }
}

/// Marker carried by an answer option whose selection says something structural
/// about the respondent. Adjustment rules are keyed on these, never on raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContextFlag {
    Region(RegionStatus),
    OrganisationSize(OrganisationSize),
}

impl ContextFlag {
    pub fn describe(&self) -> String {
        match self {
            Self::Region(status) => format!("respondent is {}", status.label()),
            Self::OrganisationSize(size) => format!("organisation is {}", size.label()),
        }
    }
}

/// Context captured from the committed answers of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub region: Option<RegionStatus>,
    pub organisation_size: Option<OrganisationSize>,
}

impl ContextFlags {
    pub fn record(&mut self, flag: ContextFlag) {
        match flag {
            ContextFlag::Region(status) => self.region = Some(status),
            ContextFlag::OrganisationSize(size) => self.organisation_size = Some(size),
        }
    }

    /// A flag that was never captured does not hold.
    pub fn holds(&self, flag: &ContextFlag) -> bool {
        match flag {
            ContextFlag::Region(status) => self.region == Some(*status),
            ContextFlag::OrganisationSize(size) => self.organisation_size == Some(*size),
        }
    }

    /// Rebuild the flags from scratch so an edited answer replaces its old flag.
    ///
    /// Questions are visited in schema order and options in declaration order, so
    /// the outcome does not depend on the order answers were committed.
    pub fn derive(schema: &Schema, answers: &BTreeMap<QuestionId, BTreeSet<String>>) -> Self {
        let mut flags = Self::default();
        for question in schema.questions() {
            let Some(selected) = answers.get(&question.id) else {
                continue;
            };
            for option in &question.options {
                if let Some(flag) = option.context {
                    if selected.contains(&option.value) {
                        flags.record(flag);
                    }
                }
            }
        }
        flags
    }
}

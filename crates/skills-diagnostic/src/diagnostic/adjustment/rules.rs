use serde::{Deserialize, Serialize};

use super::super::context::ContextFlag;
use super::super::schema::CategoryId;

/// Declarative post-questionnaire rule, keyed on a captured context flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AdjustmentRule {
    /// Structural precondition violated: the programmes can never be eligible.
    HardExclusion {
        when: ContextFlag,
        categories: Vec<CategoryId>,
    },
    /// Profile fit: nudge one programme's score without deciding eligibility outright.
    SoftWeighting {
        when: ContextFlag,
        category: CategoryId,
        delta: i32,
    },
}

impl AdjustmentRule {
    pub fn condition(&self) -> &ContextFlag {
        match self {
            Self::HardExclusion { when, .. } | Self::SoftWeighting { when, .. } => when,
        }
    }

    pub fn categories(&self) -> Vec<&CategoryId> {
        match self {
            Self::HardExclusion { categories, .. } => categories.iter().collect(),
            Self::SoftWeighting { category, .. } => vec![category],
        }
    }
}

/// What a fired rule did to one programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "delta", rename_all = "snake_case")]
pub enum AdjustmentEffect {
    Excluded,
    Weighted(i32),
}

/// Audit entry for a rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub category: CategoryId,
    pub condition: ContextFlag,
    pub effect: AdjustmentEffect,
}

impl AppliedAdjustment {
    pub fn summary(&self) -> String {
        match self.effect {
            AdjustmentEffect::Excluded => format!(
                "{} excluded because {}",
                self.category,
                self.condition.describe()
            ),
            AdjustmentEffect::Weighted(delta) => format!(
                "{} adjusted by {:+} because {}",
                self.category,
                delta,
                self.condition.describe()
            ),
        }
    }
}

mod rules;

pub use rules::{AdjustmentEffect, AdjustmentRule, AppliedAdjustment};

use serde::Serialize;

use super::context::ContextFlags;
use super::schema::{CategoryId, Schema};
use super::scoring::ScoreCard;

/// One programme after the contextual rules ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustedScore {
    pub category: CategoryId,
    /// Total accumulated from answers alone.
    pub raw: i32,
    /// `raw` plus every soft weighting that fired.
    pub score: i32,
    /// Set by a hard exclusion. Ineligible whatever `score` says.
    pub excluded: bool,
}

/// Complete adjustment output: one entry per programme in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustedScores {
    entries: Vec<AdjustedScore>,
    applied: Vec<AppliedAdjustment>,
}

impl AdjustedScores {
    pub fn entries(&self) -> &[AdjustedScore] {
        &self.entries
    }

    pub fn get(&self, category: &CategoryId) -> Option<&AdjustedScore> {
        self.entries
            .iter()
            .find(|entry| &entry.category == category)
    }

    pub fn applied(&self) -> &[AppliedAdjustment] {
        &self.applied
    }
}

/// Apply the schema's adjustment rules to the final raw totals.
///
/// Rules are evaluated in authored order. Exclusion is a flag rather than a
/// score, so no weighting evaluated before or after it can undo it.
pub fn adjust(schema: &Schema, scores: &ScoreCard, context: &ContextFlags) -> AdjustedScores {
    let mut entries: Vec<AdjustedScore> = schema
        .categories()
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let raw = scores.get(index).unwrap_or_default();
            AdjustedScore {
                category: category.id.clone(),
                raw,
                score: raw,
                excluded: false,
            }
        })
        .collect();
    let mut applied = Vec::new();

    for rule in schema.adjustments() {
        let condition = rule.condition();
        if !context.holds(condition) {
            continue;
        }

        match rule {
            AdjustmentRule::HardExclusion { categories, .. } => {
                for category in categories {
                    let Some(index) = schema.category_index(category) else {
                        continue;
                    };
                    entries[index].excluded = true;
                    applied.push(AppliedAdjustment {
                        category: category.clone(),
                        condition: *condition,
                        effect: AdjustmentEffect::Excluded,
                    });
                }
            }
            AdjustmentRule::SoftWeighting {
                category, delta, ..
            } => {
                let Some(index) = schema.category_index(category) else {
                    continue;
                };
                entries[index].score += delta;
                applied.push(AppliedAdjustment {
                    category: category.clone(),
                    condition: *condition,
                    effect: AdjustmentEffect::Weighted(*delta),
                });
            }
        }
    }

    AdjustedScores { entries, applied }
}

use serde::Serialize;

use super::adjustment::{AdjustedScores, AppliedAdjustment};
use super::schema::{CategoryId, Schema};

/// Final standing of one programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutcome {
    pub category: CategoryId,
    pub raw_score: i32,
    pub adjusted_score: i32,
    pub threshold: i32,
    pub excluded: bool,
    pub eligible: bool,
}

/// Produced once per session, when the final question is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticResult {
    categories: Vec<CategoryOutcome>,
    eligible: Vec<CategoryId>,
    top: Option<CategoryId>,
    secondary: Vec<CategoryId>,
    closest: Option<CategoryId>,
    adjustments: Vec<AppliedAdjustment>,
}

/// How the presentation layer should frame a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Recommended {
        top: &'a CategoryId,
        secondary: &'a [CategoryId],
    },
    /// Not a failure: nothing met its threshold, so offer general guidance and
    /// the closest non-excluded programme, if any.
    NoEligibleCategory { closest: Option<&'a CategoryId> },
}

impl DiagnosticResult {
    /// Every programme, in declaration order.
    pub fn categories(&self) -> &[CategoryOutcome] {
        &self.categories
    }

    pub fn category(&self, id: &CategoryId) -> Option<&CategoryOutcome> {
        self.categories
            .iter()
            .find(|outcome| &outcome.category == id)
    }

    /// Eligible programmes, best first.
    pub fn eligible(&self) -> &[CategoryId] {
        &self.eligible
    }

    pub fn is_eligible(&self, id: &CategoryId) -> bool {
        self.eligible.contains(id)
    }

    pub fn top(&self) -> Option<&CategoryId> {
        self.top.as_ref()
    }

    pub fn secondary(&self) -> &[CategoryId] {
        &self.secondary
    }

    pub fn closest(&self) -> Option<&CategoryId> {
        self.closest.as_ref()
    }

    pub fn adjustments(&self) -> &[AppliedAdjustment] {
        &self.adjustments
    }

    pub fn adjusted_score(&self, id: &CategoryId) -> Option<i32> {
        self.category(id).map(|outcome| outcome.adjusted_score)
    }

    pub fn outcome(&self) -> Outcome<'_> {
        match &self.top {
            Some(top) => Outcome::Recommended {
                top,
                secondary: &self.secondary,
            },
            None => Outcome::NoEligibleCategory {
                closest: self.closest.as_ref(),
            },
        }
    }
}

/// Filter by threshold and order the survivors.
///
/// Ordering is descending adjusted score, with ties resolved by declaration
/// order in the schema. The sort key is total, so the result never depends on
/// iteration order.
pub fn rank(schema: &Schema, adjusted: &AdjustedScores) -> DiagnosticResult {
    let categories: Vec<CategoryOutcome> = adjusted
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let threshold = schema.threshold_at(index).unwrap_or(i32::MAX);
            CategoryOutcome {
                category: entry.category.clone(),
                raw_score: entry.raw,
                adjusted_score: entry.score,
                threshold,
                excluded: entry.excluded,
                eligible: !entry.excluded && entry.score >= threshold,
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..categories.len()).collect();
    order.sort_by(|&left, &right| {
        categories[right]
            .adjusted_score
            .cmp(&categories[left].adjusted_score)
            .then(left.cmp(&right))
    });

    let eligible: Vec<CategoryId> = order
        .iter()
        .filter(|&&index| categories[index].eligible)
        .map(|&index| categories[index].category.clone())
        .collect();

    let top = eligible.first().cloned();
    let secondary = eligible.iter().skip(1).cloned().collect();
    let closest = if top.is_none() {
        order
            .iter()
            .find(|&&index| !categories[index].excluded)
            .map(|&index| categories[index].category.clone())
    } else {
        None
    };

    DiagnosticResult {
        categories,
        eligible,
        top,
        secondary,
        closest,
        adjustments: adjusted.applied().to_vec(),
    }
}

use std::collections::BTreeSet;

use serde::Serialize;

use super::schema::Schema;

/// Per-programme totals, indexed by the schema's category declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreCard(Vec<i32>);

impl ScoreCard {
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn from_values(values: Vec<i32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[i32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // `Schema::new` bounds every total to the i32 range, so these cannot overflow.
    pub(crate) fn accumulate(&mut self, delta: &ScoreCard) {
        for (total, step) in self.0.iter_mut().zip(&delta.0) {
            *total += step;
        }
    }

    pub(crate) fn retract(&mut self, delta: &ScoreCard) {
        for (total, step) in self.0.iter_mut().zip(&delta.0) {
            *total -= step;
        }
    }
}

/// Summed contribution of the selected values of the question at `position`.
///
/// Values that do not name an option of the question contribute nothing.
pub fn contribution(schema: &Schema, position: usize, selected: &BTreeSet<String>) -> ScoreCard {
    let mut total = schema.zeroed_scores();
    let Some(question) = schema.question_at(position) else {
        return total;
    };

    for (option_index, option) in question.options.iter().enumerate() {
        if !selected.contains(&option.value) {
            continue;
        }
        if let Some(delta) = schema.option_contribution(position, option_index) {
            total.accumulate(delta);
        }
    }

    total
}

/// Fold one answer into a copy of `scores`.
pub fn apply_answer(
    schema: &Schema,
    scores: &ScoreCard,
    position: usize,
    selected: &BTreeSet<String>,
) -> ScoreCard {
    let mut next = scores.clone();
    next.accumulate(&contribution(schema, position, selected));
    next
}

/// Inverse of [`apply_answer`] for the same selection.
pub fn retract_answer(
    schema: &Schema,
    scores: &ScoreCard,
    position: usize,
    selected: &BTreeSet<String>,
) -> ScoreCard {
    let mut next = scores.clone();
    next.retract(&contribution(schema, position, selected));
    next
}

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Role an index plays in a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightRole {
    Compare,
    Swap,
    Pivot,
    /// The index has just been settled: a placed key, a settled pivot or a
    /// freshly merged segment.
    Sorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InProgress,
    Complete,
}

/// Immutable snapshot of one observable moment of a sort in progress.
///
/// `values` is an owned copy of the working array taken when the step was
/// emitted, so later mutation by the engine never reaches a step that has
/// already been handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortStep<T> {
    pub values: Vec<T>,
    pub highlighted: BTreeMap<usize, HighlightRole>,
    /// Indices already known to hold their final value.
    pub sorted: BTreeSet<usize>,
    pub phase: Phase,
    pub description: String,
}

impl<T: Clone> SortStep<T> {
    pub fn in_progress(
        values: &[T],
        highlighted: impl IntoIterator<Item = (usize, HighlightRole)>,
        sorted: &BTreeSet<usize>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            values: values.to_vec(),
            highlighted: highlighted.into_iter().collect(),
            sorted: sorted.clone(),
            phase: Phase::InProgress,
            description: description.into(),
        }
    }

    /// Terminal step: no highlights and every index marked sorted.
    pub fn complete(values: &[T], description: impl Into<String>) -> Self {
        Self {
            values: values.to_vec(),
            highlighted: BTreeMap::new(),
            sorted: (0..values.len()).collect(),
            phase: Phase::Complete,
            description: description.into(),
        }
    }

    /// Snapshot shown before the first step of a fresh sequence.
    pub fn initial(values: &[T]) -> Self {
        Self {
            values: values.to_vec(),
            highlighted: BTreeMap::new(),
            sorted: BTreeSet::new(),
            phase: Phase::InProgress,
            description: String::new(),
        }
    }
}

impl<T> SortStep<T> {
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn role_of(&self, index: usize) -> Option<HighlightRole> {
        self.highlighted.get(&index).copied()
    }

    pub fn has_role(&self, role: HighlightRole) -> bool {
        self.highlighted.values().any(|r| *r == role)
    }

    /// Whether the sorted set spans every index of the array.
    pub fn covers_all(&self) -> bool {
        self.sorted.len() == self.values.len()
            && self.sorted.iter().enumerate().all(|(i, idx)| i == *idx)
    }
}

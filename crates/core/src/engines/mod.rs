//! Sorting algorithms exposed as lazy sequences of [`SortStep`] values.
//!
//! Every engine is a small state machine that owns a private copy of the
//! input. Each call to `next` runs the algorithm up to its next observable
//! event (one comparison, one swap, one partition or merge decision) and
//! hands back a snapshot of that moment. The final item of every sequence is
//! a single [`Phase::Complete`](crate::Phase::Complete) step carrying the
//! sorted array.
//!
//! # Example
//!
//! ```
//! use sort_visualiser_core::{Algorithm, SortOrder};
//!
//! let steps: Vec<_> = Algorithm::Selection
//!     .steps(&[5, 3, 1, 4, 2], SortOrder::Ascending)
//!     .unwrap()
//!     .collect();
//!
//! let last = steps.last().unwrap();
//! assert!(last.is_complete());
//! assert_eq!(last.values, vec![1, 2, 3, 4, 5]);
//! ```

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

use std::{collections::BTreeSet, fmt, iter::FusedIterator, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{HighlightRole, Result, SortStep, SortVizError};

pub use bubble::BubbleSteps;
pub use insertion::InsertionSteps;
pub use merge::MergeSteps;
pub use quick::QuickSteps;
pub use selection::SelectionSteps;

/// The sorting algorithms the visualiser can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Insertion,
    Selection,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Insertion,
        Algorithm::Selection,
        Algorithm::Quick,
        Algorithm::Merge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Quick => "Quick Sort",
            Algorithm::Merge => "Merge Sort",
        }
    }

    /// Resolves the 1-based slot used by the number keys.
    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn slot(self) -> usize {
        Self::ALL
            .iter()
            .position(|a| *a == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    /// Starts a fresh step sequence over a private copy of `input`.
    pub fn steps<T>(self, input: &[T], order: SortOrder) -> Result<StepSequence<T>>
    where
        T: Copy + PartialOrd,
    {
        self.steps_with(
            input,
            EngineOptions {
                order,
                ..EngineOptions::default()
            },
        )
    }

    /// Like [`Algorithm::steps`] with every engine option spelled out.
    ///
    /// Fails with [`SortVizError::InvalidInput`] when an element cannot be
    /// ordered (a NaN among floats); no step is produced in that case.
    pub fn steps_with<T>(self, input: &[T], options: EngineOptions) -> Result<StepSequence<T>>
    where
        T: Copy + PartialOrd,
    {
        validate(input)?;

        let engine = if input.len() < 2 {
            Engine::Trivial(Some(SortStep::complete(
                input,
                format!("{} complete", self.name()),
            )))
        } else {
            let workspace = Workspace::new(input.to_vec(), options.order);
            match self {
                Algorithm::Bubble => {
                    Engine::Bubble(BubbleSteps::new(workspace, options.bubble_early_exit))
                }
                Algorithm::Insertion => Engine::Insertion(InsertionSteps::new(workspace)),
                Algorithm::Selection => Engine::Selection(SelectionSteps::new(workspace)),
                Algorithm::Quick => Engine::Quick(QuickSteps::new(workspace)),
                Algorithm::Merge => Engine::Merge(MergeSteps::new(workspace)),
            }
        };

        Ok(StepSequence {
            algorithm: self,
            engine,
            emitted: 0,
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_lowercase();
        let stem = normalised
            .strip_suffix(" sort")
            .or_else(|| normalised.strip_suffix("sort"))
            .unwrap_or(&normalised)
            .trim();

        match stem {
            "bubble" => Ok(Algorithm::Bubble),
            "insertion" => Ok(Algorithm::Insertion),
            "selection" => Ok(Algorithm::Selection),
            "quick" => Ok(Algorithm::Quick),
            "merge" => Ok(Algorithm::Merge),
            _ => Err(SortVizError::invalid_input(format!(
                "unknown algorithm `{s}`"
            ))),
        }
    }
}

/// Direction the engines sort towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// True when `left` must end up after `right`.
    pub fn out_of_order<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            SortOrder::Ascending => left > right,
            SortOrder::Descending => left < right,
        }
    }

    pub fn is_sorted<T: PartialOrd>(self, values: &[T]) -> bool {
        values.windows(2).all(|w| !self.out_of_order(&w[0], &w[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub order: SortOrder,
    /// Stop bubble sort after the first pass that performs no swap.
    pub bubble_early_exit: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            order: SortOrder::Ascending,
            bubble_early_exit: true,
        }
    }
}

fn validate<T: PartialOrd>(input: &[T]) -> Result<()> {
    match input.iter().position(|v| v.partial_cmp(v).is_none()) {
        Some(index) => Err(SortVizError::invalid_input(format!(
            "element at index {index} is not comparable"
        ))),
        None => Ok(()),
    }
}

/// Lazy, finite and non-restartable sequence of steps for one run of one
/// algorithm.
///
/// Once the terminal step has been returned the sequence yields `None`
/// forever.
#[derive(Debug)]
pub struct StepSequence<T> {
    algorithm: Algorithm,
    engine: Engine<T>,
    emitted: usize,
}

impl<T> StepSequence<T> {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of steps handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl<T: Copy + PartialOrd> Iterator for StepSequence<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match &mut self.engine {
            Engine::Trivial(step) => step.take(),
            Engine::Bubble(engine) => engine.next(),
            Engine::Insertion(engine) => engine.next(),
            Engine::Selection(engine) => engine.next(),
            Engine::Quick(engine) => engine.next(),
            Engine::Merge(engine) => engine.next(),
        };
        if step.is_some() {
            self.emitted += 1;
        }
        step
    }
}

impl<T: Copy + PartialOrd> FusedIterator for StepSequence<T> {}

#[derive(Debug)]
enum Engine<T> {
    Trivial(Option<SortStep<T>>),
    Bubble(BubbleSteps<T>),
    Insertion(InsertionSteps<T>),
    Selection(SelectionSteps<T>),
    Quick(QuickSteps<T>),
    Merge(MergeSteps<T>),
}

/// Working array shared by the engine state machines, together with the set
/// of indices already settled in their final position.
#[derive(Debug)]
pub(crate) struct Workspace<T> {
    values: Vec<T>,
    sorted: BTreeSet<usize>,
    order: SortOrder,
}

impl<T: Copy + PartialOrd> Workspace<T> {
    pub(crate) fn new(values: Vec<T>, order: SortOrder) -> Self {
        Self {
            values,
            sorted: BTreeSet::new(),
            order,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the value at `left` belongs after the value at `right`.
    pub(crate) fn out_of_order(&self, left: usize, right: usize) -> bool {
        self.order
            .out_of_order(&self.values[left], &self.values[right])
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.values.swap(a, b);
    }

    pub(crate) fn settle(&mut self, index: usize) {
        self.sorted.insert(index);
    }

    pub(crate) fn settle_range(&mut self, range: std::ops::Range<usize>) {
        self.sorted.extend(range);
    }

    pub(crate) fn step(
        &self,
        highlighted: impl IntoIterator<Item = (usize, HighlightRole)>,
        description: impl Into<String>,
    ) -> SortStep<T> {
        SortStep::in_progress(&self.values, highlighted, &self.sorted, description)
    }

    pub(crate) fn complete(&self, algorithm: Algorithm) -> SortStep<T> {
        SortStep::complete(&self.values, format!("{} complete", algorithm.name()))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::Phase;

    fn random_input(rng: &mut StdRng, len: usize) -> Vec<u32> {
        // A narrow value range guarantees plenty of duplicates.
        (0..len).map(|_| rng.gen_range(0..=len as u32 / 2 + 1)).collect()
    }

    fn run(algorithm: Algorithm, input: &[u32], order: SortOrder) -> Vec<SortStep<u32>> {
        algorithm.steps(input, order).unwrap().collect()
    }

    fn sorted_copy(input: &[u32], order: SortOrder) -> Vec<u32> {
        let mut expected = input.to_vec();
        expected.sort_unstable();
        if order == SortOrder::Descending {
            expected.reverse();
        }
        expected
    }

    #[test]
    fn every_engine_sorts_random_inputs_with_duplicates() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for algorithm in Algorithm::ALL {
            for order in [SortOrder::Ascending, SortOrder::Descending] {
                for len in (0..=200).step_by(7).chain([1, 2, 3, 200]) {
                    let input = random_input(&mut rng, len);
                    let steps = run(algorithm, &input, order);

                    let last = steps.last().expect("at least one step");
                    assert!(last.is_complete(), "{algorithm} len {len}");
                    assert!(last.covers_all(), "{algorithm} len {len}");
                    assert_eq!(last.values, sorted_copy(&input, order), "{algorithm}");
                    assert!(order.is_sorted(&last.values));

                    assert!(steps.iter().all(|s| s.values.len() == input.len()));
                    let completes = steps.iter().filter(|s| s.is_complete()).count();
                    assert_eq!(completes, 1, "{algorithm} len {len}");
                }
            }
        }
    }

    #[test]
    fn trivial_inputs_yield_a_single_complete_step() {
        for algorithm in Algorithm::ALL {
            let empty = run(algorithm, &[], SortOrder::Ascending);
            assert_eq!(empty.len(), 1);
            assert_eq!(empty[0].phase, Phase::Complete);
            assert!(empty[0].covers_all());

            let single = run(algorithm, &[42], SortOrder::Ascending);
            assert_eq!(single.len(), 1);
            assert_eq!(single[0].values, vec![42]);
            assert!(single[0].covers_all());
        }
    }

    #[test]
    fn already_sorted_input_still_shows_comparisons() {
        let input: Vec<u32> = (1..=20).collect();
        for algorithm in Algorithm::ALL {
            for len in [2, 3, 20] {
                let steps = run(algorithm, &input[..len], SortOrder::Ascending);
                assert!(
                    steps.iter().any(|s| s.has_role(HighlightRole::Compare)),
                    "{algorithm} emitted no comparison for len {len}"
                );
                assert!(steps.last().unwrap().is_complete());
            }
        }
    }

    #[test]
    fn rerunning_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = random_input(&mut rng, 64);
        for algorithm in Algorithm::ALL {
            let first = run(algorithm, &input, SortOrder::Ascending);
            let second = run(algorithm, &input, SortOrder::Ascending);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn selection_sort_scenario() {
        let steps = run(Algorithm::Selection, &[5, 3, 1, 4, 2], SortOrder::Ascending);
        let last = steps.last().unwrap();
        assert_eq!(last.values, vec![1, 2, 3, 4, 5]);
        assert_eq!(last.phase, Phase::Complete);
        assert_eq!(last.sorted, (0..5).collect());
    }

    #[test]
    fn sequence_stays_exhausted() {
        let mut seq = Algorithm::Quick.steps(&[2, 1], SortOrder::Ascending).unwrap();
        while seq.next().is_some() {}
        let emitted = seq.emitted();
        assert!(seq.next().is_none());
        assert!(seq.next().is_none());
        assert_eq!(seq.emitted(), emitted);
    }

    #[test]
    fn rejects_incomparable_input_before_any_step() {
        let err = Algorithm::Merge
            .steps(&[1.0, f64::NAN, 0.5], SortOrder::Ascending)
            .unwrap_err();
        assert!(matches!(err, SortVizError::InvalidInput(_)));
        assert!(format!("{err}").contains("index 1"));

        let floats: Vec<_> = Algorithm::Insertion
            .steps(&[0.5, -1.0, 2.5], SortOrder::Ascending)
            .unwrap()
            .collect();
        assert_eq!(floats.last().unwrap().values, vec![-1.0, 0.5, 2.5]);
    }

    #[test]
    fn parses_names_and_slots() {
        assert_eq!("quick".parse::<Algorithm>().unwrap(), Algorithm::Quick);
        assert_eq!("Merge Sort".parse::<Algorithm>().unwrap(), Algorithm::Merge);
        assert_eq!("BUBBLESORT".parse::<Algorithm>().unwrap(), Algorithm::Bubble);
        assert!("heap".parse::<Algorithm>().is_err());

        assert_eq!(Algorithm::from_slot(3), Some(Algorithm::Selection));
        assert_eq!(Algorithm::from_slot(0), None);
        assert_eq!(Algorithm::from_slot(6), None);
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_slot(algorithm.slot()), Some(algorithm));
        }
    }
}

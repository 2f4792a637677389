use crate::{Algorithm, HighlightRole, SortStep};

use super::Workspace;

/// Step producer for [Insertion Sort](https://en.wikipedia.org/wiki/Insertion_sort).
///
/// The key is walked leftwards with adjacent swaps rather than shifted into
/// a hole, so every snapshot is a permutation of the input.
#[derive(Debug)]
pub struct InsertionSteps<T> {
    work: Workspace<T>,
    /// Index of the key being inserted.
    key: usize,
    /// Current position of the key while it travels left.
    cursor: usize,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Select,
    Compare,
    Shift,
    Place,
    Finish,
    Done,
}

impl<T: Copy + PartialOrd> InsertionSteps<T> {
    pub(crate) fn new(mut work: Workspace<T>) -> Self {
        // a single leading element is trivially in order with itself
        work.settle(0);
        Self {
            work,
            key: 1,
            cursor: 1,
            state: State::Select,
        }
    }
}

impl<T: Copy + PartialOrd> Iterator for InsertionSteps<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Select => {
                    if self.key >= self.work.len() {
                        self.state = State::Finish;
                        continue;
                    }
                    self.cursor = self.key;
                    self.state = State::Compare;
                    return Some(self.work.step(
                        [(self.key, HighlightRole::Pivot)],
                        format!("Selecting key at index {}", self.key),
                    ));
                }
                State::Compare => {
                    let j = self.cursor;
                    if j == 0 {
                        self.state = State::Place;
                        continue;
                    }
                    self.state = if self.work.out_of_order(j - 1, j) {
                        State::Shift
                    } else {
                        State::Place
                    };
                    return Some(self.work.step(
                        [(j - 1, HighlightRole::Compare), (j, HighlightRole::Compare)],
                        format!("Comparing key with index {}", j - 1),
                    ));
                }
                State::Shift => {
                    let j = self.cursor;
                    self.work.swap(j - 1, j);
                    self.cursor -= 1;
                    self.state = State::Compare;
                    return Some(self.work.step(
                        [(j - 1, HighlightRole::Swap), (j, HighlightRole::Swap)],
                        format!("Shifting value at index {} to index {j}", j - 1),
                    ));
                }
                State::Place => {
                    self.work.settle_range(0..self.key + 1);
                    let at = self.cursor;
                    self.key += 1;
                    self.state = State::Select;
                    return Some(self.work.step(
                        [(at, HighlightRole::Sorted)],
                        format!("Inserted key at index {at}"),
                    ));
                }
                State::Finish => {
                    self.state = State::Done;
                    return Some(self.work.complete(Algorithm::Insertion));
                }
                State::Done => return None,
            }
        }
    }
}

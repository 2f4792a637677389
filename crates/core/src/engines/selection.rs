use crate::{Algorithm, HighlightRole, SortStep};

use super::Workspace;

/// Step producer for [Selection Sort](https://en.wikipedia.org/wiki/Selection_sort).
///
/// Each pass scans the unsorted suffix for its extremum (smallest when
/// ascending, largest when descending), shows the running candidate as the
/// pivot and finishes with exactly one swap that moves it to the front of
/// the suffix.
#[derive(Debug)]
pub struct SelectionSteps<T> {
    work: Workspace<T>,
    /// First index of the unsorted suffix.
    front: usize,
    /// Best candidate found so far in the current pass.
    best: usize,
    scan: usize,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scan,
    Found,
    Place,
    Finish,
    Done,
}

impl<T: Copy + PartialOrd> SelectionSteps<T> {
    pub(crate) fn new(work: Workspace<T>) -> Self {
        Self {
            work,
            front: 0,
            best: 0,
            scan: 1,
            state: State::Scan,
        }
    }
}

impl<T: Copy + PartialOrd> Iterator for SelectionSteps<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Scan => {
                    let j = self.scan;
                    if j >= self.work.len() {
                        self.state = State::Place;
                        continue;
                    }
                    let step = self.work.step(
                        [(self.best, HighlightRole::Pivot), (j, HighlightRole::Compare)],
                        format!("Finding extremum from index {} onward", self.front),
                    );
                    if self.work.out_of_order(self.best, j) {
                        self.best = j;
                        self.state = State::Found;
                    }
                    self.scan += 1;
                    return Some(step);
                }
                State::Found => {
                    self.state = State::Scan;
                    return Some(self.work.step(
                        [(self.best, HighlightRole::Pivot)],
                        format!("New extremum at index {}", self.best),
                    ));
                }
                State::Place => {
                    let (front, best) = (self.front, self.best);
                    self.work.swap(front, best);
                    self.work.settle(front);

                    self.front += 1;
                    self.best = self.front;
                    self.scan = self.front + 1;
                    self.state = if self.front >= self.work.len() {
                        State::Finish
                    } else {
                        State::Scan
                    };
                    return Some(self.work.step(
                        [(best, HighlightRole::Swap), (front, HighlightRole::Sorted)],
                        format!("Swapped extremum into position {front}"),
                    ));
                }
                State::Finish => {
                    self.state = State::Done;
                    return Some(self.work.complete(Algorithm::Selection));
                }
                State::Done => return None,
            }
        }
    }
}

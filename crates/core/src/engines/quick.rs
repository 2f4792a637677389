use crate::{Algorithm, HighlightRole, SortStep};

use super::Workspace;

/// Step producer for [Quick Sort](https://en.wikipedia.org/wiki/Quicksort)
/// using the Lomuto partition scheme with the last element of each range as
/// pivot.
///
/// Pending ranges live on an explicit stack; the left partition is always
/// processed before the right one, which keeps runs reproducible. Settled
/// pivots are highlighted but the sorted set stays empty until the terminal
/// step.
#[derive(Debug)]
pub struct QuickSteps<T> {
    work: Workspace<T>,
    /// Half-open ranges still waiting to be partitioned.
    pending: Vec<(usize, usize)>,
    lo: usize,
    hi: usize,
    /// Next slot for an element that belongs left of the pivot.
    store: usize,
    scan: usize,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NextRange,
    Scan,
    Swap,
    Settle,
    Finish,
    Done,
}

impl<T: Copy + PartialOrd> QuickSteps<T> {
    pub(crate) fn new(work: Workspace<T>) -> Self {
        let len = work.len();
        Self {
            work,
            pending: vec![(0, len)],
            lo: 0,
            hi: 0,
            store: 0,
            scan: 0,
            state: State::NextRange,
        }
    }

    fn pivot(&self) -> usize {
        self.hi - 1
    }
}

impl<T: Copy + PartialOrd> Iterator for QuickSteps<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::NextRange => {
                    let Some((lo, hi)) = self.pending.pop() else {
                        self.state = State::Finish;
                        continue;
                    };
                    match hi - lo {
                        0 => continue,
                        1 => {
                            return Some(self.work.step(
                                [(lo, HighlightRole::Sorted)],
                                format!("Index {lo} is in place"),
                            ));
                        }
                        _ => {
                            self.lo = lo;
                            self.hi = hi;
                            self.store = lo;
                            self.scan = lo;
                            self.state = State::Scan;
                            let pivot = self.pivot();
                            return Some(self.work.step(
                                [(pivot, HighlightRole::Pivot)],
                                format!("Pivot chosen at index {pivot}"),
                            ));
                        }
                    }
                }
                State::Scan => {
                    let (j, pivot) = (self.scan, self.pivot());
                    if j >= pivot {
                        self.state = State::Settle;
                        continue;
                    }
                    self.state = if self.work.out_of_order(j, pivot) {
                        self.scan += 1;
                        State::Scan
                    } else {
                        State::Swap
                    };
                    return Some(self.work.step(
                        [(j, HighlightRole::Compare), (pivot, HighlightRole::Pivot)],
                        format!("Comparing index {j} with pivot"),
                    ));
                }
                State::Swap => {
                    let (i, j) = (self.store, self.scan);
                    self.work.swap(i, j);
                    self.store += 1;
                    self.scan += 1;
                    self.state = State::Scan;
                    return Some(self.work.step(
                        [(i, HighlightRole::Swap), (j, HighlightRole::Swap)],
                        format!("Swapped indices {i} and {j}"),
                    ));
                }
                State::Settle => {
                    let settled = self.store;
                    self.work.swap(settled, self.pivot());
                    // right first so the left partition is popped next
                    self.pending.push((settled + 1, self.hi));
                    self.pending.push((self.lo, settled));
                    self.state = State::NextRange;
                    return Some(self.work.step(
                        [(settled, HighlightRole::Sorted)],
                        format!("Pivot settled at index {settled}"),
                    ));
                }
                State::Finish => {
                    self.state = State::Done;
                    return Some(self.work.complete(Algorithm::Quick));
                }
                State::Done => return None,
            }
        }
    }
}

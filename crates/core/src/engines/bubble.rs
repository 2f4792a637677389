use crate::{Algorithm, HighlightRole, SortStep};

use super::Workspace;

/// Step producer for [Bubble Sort](https://en.wikipedia.org/wiki/Bubble_sort).
///
/// Every adjacent pair examined is shown as a comparison, every corrected
/// inversion as a swap, and the end of each pass settles one more index at
/// the tail of the array.
#[derive(Debug)]
pub struct BubbleSteps<T> {
    work: Workspace<T>,
    early_exit: bool,
    pass: usize,
    index: usize,
    swapped: bool,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Compare,
    Swap,
    Settle,
    Finish,
    Done,
}

impl<T: Copy + PartialOrd> BubbleSteps<T> {
    pub(crate) fn new(work: Workspace<T>, early_exit: bool) -> Self {
        Self {
            work,
            early_exit,
            pass: 0,
            index: 0,
            swapped: false,
            state: State::Compare,
        }
    }
}

impl<T: Copy + PartialOrd> Iterator for BubbleSteps<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.work.len();
        loop {
            match self.state {
                State::Compare => {
                    let j = self.index;
                    if j + 1 >= n - self.pass {
                        self.state = State::Settle;
                        continue;
                    }
                    self.state = if self.work.out_of_order(j, j + 1) {
                        State::Swap
                    } else {
                        self.index += 1;
                        State::Compare
                    };
                    return Some(self.work.step(
                        [(j, HighlightRole::Compare), (j + 1, HighlightRole::Compare)],
                        format!("Comparing indices {j} and {}", j + 1),
                    ));
                }
                State::Swap => {
                    let j = self.index;
                    self.work.swap(j, j + 1);
                    self.swapped = true;
                    self.index += 1;
                    self.state = State::Compare;
                    return Some(self.work.step(
                        [(j, HighlightRole::Swap), (j + 1, HighlightRole::Swap)],
                        format!("Swapped indices {j} and {}", j + 1),
                    ));
                }
                State::Settle => {
                    let settled = n - self.pass - 1;
                    let finished_early = self.early_exit && !self.swapped;
                    let description = if finished_early {
                        self.work.settle_range(0..settled + 1);
                        format!("No swaps in this pass, positions 0 to {settled} are sorted")
                    } else {
                        self.work.settle(settled);
                        format!("Position {settled} is sorted")
                    };

                    self.pass += 1;
                    self.index = 0;
                    self.swapped = false;
                    self.state = if finished_early || self.pass >= n {
                        State::Finish
                    } else {
                        State::Compare
                    };
                    return Some(
                        self.work
                            .step([(settled, HighlightRole::Sorted)], description),
                    );
                }
                State::Finish => {
                    self.state = State::Done;
                    return Some(self.work.complete(Algorithm::Bubble));
                }
                State::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortOrder;

    fn steps(input: &[u32], early_exit: bool) -> Vec<SortStep<u32>> {
        BubbleSteps::new(Workspace::new(input.to_vec(), SortOrder::Ascending), early_exit)
            .collect()
    }

    #[test]
    fn arbitrary_array() {
        let all = steps(&[1, 5, 4, 2, 3], true);
        assert_eq!(all.last().unwrap().values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn first_pass_walks_every_adjacent_pair() {
        let all = steps(&[3, 2, 1], false);
        assert_eq!(all[0].role_of(0), Some(HighlightRole::Compare));
        assert_eq!(all[0].role_of(1), Some(HighlightRole::Compare));
        assert_eq!(all[1].role_of(0), Some(HighlightRole::Swap));
        assert_eq!(all[1].values, vec![2, 3, 1]);
        assert_eq!(all[2].role_of(1), Some(HighlightRole::Compare));
        assert_eq!(all[3].values, vec![2, 1, 3]);
        assert_eq!(all[4].role_of(2), Some(HighlightRole::Sorted));
        assert!(all[4].sorted.contains(&2));
    }

    #[test]
    fn sorted_tail_grows_one_index_per_pass() {
        let all = steps(&[4, 3, 2, 1], false);
        let settles: Vec<usize> = all
            .iter()
            .filter(|s| !s.is_complete() && s.has_role(HighlightRole::Sorted))
            .map(|s| s.sorted.len())
            .collect();
        assert_eq!(settles, vec![1, 2, 3, 4]);
    }

    #[test]
    fn early_exit_still_shows_the_comparisons_of_the_last_pass() {
        let exited = steps(&[1, 2, 3, 4], true);
        let compares = exited
            .iter()
            .filter(|s| s.has_role(HighlightRole::Compare))
            .count();
        assert_eq!(compares, 3);
        // three comparisons, one settle step covering everything, the terminal step
        assert_eq!(exited.len(), 5);
        assert!(exited[3].covers_all());

        let full = steps(&[1, 2, 3, 4], false);
        assert!(full.len() > exited.len());
        assert_eq!(full.last().unwrap().values, exited.last().unwrap().values);
    }
}

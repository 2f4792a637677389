use crate::{Algorithm, HighlightRole, SortStep};

use super::Workspace;

/// Step producer for top-down [Merge Sort](https://en.wikipedia.org/wiki/Merge_sort).
///
/// The recursion is unrolled onto an explicit stack of split and merge
/// tasks. Merged values are written straight back into the working array, so
/// every snapshot shows the partially merged state rather than a side buffer.
#[derive(Debug)]
pub struct MergeSteps<T> {
    work: Workspace<T>,
    tasks: Vec<Task>,
    merge: Option<Merge<T>>,
    finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Split { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

/// An in-flight merge of `[lo, mid)` and `[mid, hi)`.
#[derive(Debug)]
struct Merge<T> {
    lo: usize,
    mid: usize,
    hi: usize,
    left: Vec<T>,
    right: Vec<T>,
    i: usize,
    j: usize,
    /// Next index of the working array to write.
    out: usize,
    /// Side chosen by the last comparison, written on the next step.
    take_left: Option<bool>,
}

impl<T: Copy + PartialOrd> MergeSteps<T> {
    pub(crate) fn new(work: Workspace<T>) -> Self {
        let len = work.len();
        Self {
            work,
            tasks: vec![Task::Split { lo: 0, hi: len }],
            merge: None,
            finished: false,
        }
    }

    fn begin_merge(&self, lo: usize, mid: usize, hi: usize) -> Merge<T> {
        Merge {
            lo,
            mid,
            hi,
            left: self.work.values[lo..mid].to_vec(),
            right: self.work.values[mid..hi].to_vec(),
            i: 0,
            j: 0,
            out: lo,
            take_left: None,
        }
    }

    fn advance_merge(&mut self, mut merge: Merge<T>) -> SortStep<T> {
        let k = merge.out;

        if let Some(take_left) = merge.take_left.take() {
            self.write(&mut merge, take_left);
            let step = self.work.step(
                [(k, HighlightRole::Swap)],
                format!("Placed value at index {k}"),
            );
            self.merge = Some(merge);
            return step;
        }

        if merge.i < merge.left.len() && merge.j < merge.right.len() {
            let highlighted = [
                (merge.lo + merge.i, HighlightRole::Compare),
                (merge.mid + merge.j, HighlightRole::Compare),
                (k, HighlightRole::Compare),
            ];
            merge.take_left = Some(
                !self
                    .work
                    .order
                    .out_of_order(&merge.left[merge.i], &merge.right[merge.j]),
            );
            let step = self.work.step(
                highlighted,
                format!("Merging indices {} to {}", merge.lo, merge.hi - 1),
            );
            self.merge = Some(merge);
            return step;
        }

        if merge.i < merge.left.len() || merge.j < merge.right.len() {
            let from_left = merge.i < merge.left.len();
            self.write(&mut merge, from_left);
            let side = if from_left { "left" } else { "right" };
            let step = self.work.step(
                [(k, HighlightRole::Swap)],
                format!("Copying remaining {side} element to index {k}"),
            );
            self.merge = Some(merge);
            return step;
        }

        // both halves drained; the merge stays cleared
        self.work.step(
            (merge.lo..merge.hi).map(|idx| (idx, HighlightRole::Sorted)),
            format!("Segment {} to {} merged", merge.lo, merge.hi - 1),
        )
    }

    fn write(&mut self, merge: &mut Merge<T>, from_left: bool) {
        let value = if from_left {
            merge.i += 1;
            merge.left[merge.i - 1]
        } else {
            merge.j += 1;
            merge.right[merge.j - 1]
        };
        self.work.values[merge.out] = value;
        merge.out += 1;
    }
}

impl<T: Copy + PartialOrd> Iterator for MergeSteps<T> {
    type Item = SortStep<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(merge) = self.merge.take() {
            return Some(self.advance_merge(merge));
        }

        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Split { lo, hi } => match hi - lo {
                    0 => continue,
                    1 => {
                        return Some(self.work.step(
                            [(lo, HighlightRole::Sorted)],
                            format!("Index {lo} is trivially sorted"),
                        ));
                    }
                    len => {
                        let mid = lo + len.div_ceil(2);
                        self.tasks.push(Task::Merge { lo, mid, hi });
                        self.tasks.push(Task::Split { lo: mid, hi });
                        self.tasks.push(Task::Split { lo, hi: mid });
                    }
                },
                Task::Merge { lo, mid, hi } => {
                    let merge = self.begin_merge(lo, mid, hi);
                    return Some(self.advance_merge(merge));
                }
            }
        }

        if self.finished {
            return None;
        }
        self.finished = true;
        Some(self.work.complete(Algorithm::Merge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortOrder;

    fn steps(input: &[u32], order: SortOrder) -> Vec<SortStep<u32>> {
        MergeSteps::new(Workspace::new(input.to_vec(), order)).collect()
    }

    #[test]
    fn arbitrary_array() {
        let all = steps(&[1, 5, 4, 2, 3], SortOrder::Ascending);
        assert_eq!(all.last().unwrap().values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn descending_order() {
        let all = steps(&[1, 5, 4, 2, 3, 5], SortOrder::Descending);
        assert_eq!(all.last().unwrap().values, vec![5, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn writes_land_in_the_working_array() {
        let all = steps(&[2, 1], SortOrder::Ascending);
        let descriptions: Vec<&str> = all.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Index 0 is trivially sorted",
                "Index 1 is trivially sorted",
                "Merging indices 0 to 1",
                "Placed value at index 0",
                "Copying remaining left element to index 1",
                "Segment 0 to 1 merged",
                "Merge Sort complete",
            ]
        );
        // the first write overwrites index 0 before the left half is copied back
        assert_eq!(all[3].values, vec![1, 1]);
        assert_eq!(all[4].values, vec![1, 2]);
    }

    #[test]
    fn left_half_takes_the_extra_element() {
        let all = steps(&[3, 2, 1], SortOrder::Ascending);
        let first_merge = all
            .iter()
            .find(|s| s.description.starts_with("Segment"))
            .unwrap();
        assert_eq!(first_merge.description, "Segment 0 to 1 merged");
        assert_eq!(first_merge.values, vec![2, 3, 1]);
    }

    #[test]
    fn sorted_set_stays_empty_until_the_end() {
        let all = steps(&[4, 4, 1, 3, 2], SortOrder::Ascending);
        let (last, rest) = all.split_last().unwrap();
        assert!(rest.iter().all(|s| s.sorted.is_empty()));
        assert!(last.covers_all());
    }
}

use itertools::Itertools;

use super::core_solver::CoreSolver;
use super::datastructures::{var, ClauseRef, Tristate};

impl CoreSolver {
    /// Returns whether some literal of the clause is currently true.
    ///
    /// Only meaningful at the root level, where every assignment is a
    /// consequence of the formula.
    fn satisfied(&self, c_ref: ClauseRef) -> bool {
        self.arena[c_ref.0].data.iter().any(|&lit| self.value(lit) == Tristate::True)
    }

    /// Returns whether the clause is the reason of one of its watched
    /// literals and therefore must not be deleted.
    fn locked(&self, c_ref: ClauseRef) -> bool {
        let clause = &self.arena[c_ref.0];
        if clause.len() <= 1 {
            return true;
        }
        let r0 = self.vars[var(clause.get(0)).0].reason;
        let r1 = self.vars[var(clause.get(1)).0].reason;
        r0 == Some(c_ref) || r1 == Some(c_ref)
    }

    /// Deletes a clause: clears any reason entry naming it, removes it
    /// from both watched lists, and releases its arena slot.
    pub(crate) fn remove_clause(&mut self, c_ref: ClauseRef) {
        let v0 = var(self.arena[c_ref.0].get(0));
        let v1 = var(self.arena[c_ref.0].get(1));
        if self.vars[v0.0].reason == Some(c_ref) {
            self.vars[v0.0].reason = None;
        } else if self.vars[v1.0].reason == Some(c_ref) {
            self.vars[v1.0].reason = None;
        }
        self.detach_watch(0, c_ref);
        self.detach_watch(1, c_ref);
        self.arena[c_ref.0].data.clear();
        self.free_slots.push(c_ref.0);
    }

    /// Removes the clause from the watched list of its literal at
    /// `position` (0 or 1), halving the list's capacity when it drops
    /// below one-quarter occupancy.
    fn detach_watch(&mut self, position: usize, c_ref: ClauseRef) {
        let wi = self.arena[c_ref.0].get(position).watch_index();
        let list = &mut self.watches[wi];
        let (index, _) = list
            .iter()
            .find_position(|&&w| w == c_ref)
            .expect("watched clause is on the list of its watch");
        list.remove(index);
        if list.len() > 1 && list.len() < list.capacity() / 4 {
            list.shrink_to(list.capacity() / 2);
        }
    }

    /// Deletes every learned clause satisfied at the root level.
    ///
    /// A no-op unless a new root fact has been derived since the last
    /// call. Intended to be called after propagation at the root.
    pub(crate) fn simplify_learned(&mut self) {
        if !self.simplify_learned_flag {
            return;
        }
        let size = self.learnts.len();
        if size == 0 {
            return;
        }
        let mut removed_literals = 0;
        let mut j = 0;
        for i in 0..size {
            let c_ref = self.learnts[i];
            if self.satisfied(c_ref) {
                removed_literals += self.arena[c_ref.0].len() as u64;
                self.remove_clause(c_ref);
            } else {
                self.learnts[j] = c_ref;
                j += 1;
            }
        }
        self.learnts.truncate(j);
        self.cur_learned_literals -= removed_literals;
        self.stats.simplifications += 1;
        self.next_simplify_conflicts = self.stats.conflicts + self.next_simplify_increment;
        // the increment starts at 0, so this schedule update stays inert
        let removed_ratio = (size - j) as f64 / size as f64;
        self.next_simplify_increment = if removed_ratio < 0.01 {
            (self.next_simplify_increment as f64 * 1.1) as u64
        } else {
            (self.next_simplify_increment as f64 * 0.9) as u64
        };
        self.simplify_learned_flag = false;
        tracing::debug!(removed = size - j, remaining = j, "simplified learned clauses");
    }

    /// Deletes every original clause satisfied at the root level.
    pub(crate) fn simplify_original(&mut self) {
        if !self.simplify_original_flag {
            return;
        }
        let size = self.originals.len();
        let mut removed_literals = 0;
        let mut j = 0;
        for i in 0..size {
            let c_ref = self.originals[i];
            if self.satisfied(c_ref) {
                removed_literals += self.arena[c_ref.0].len() as u64;
                self.remove_clause(c_ref);
            } else {
                self.originals[j] = c_ref;
                j += 1;
            }
        }
        self.originals.truncate(j);
        self.cur_original_literals -= removed_literals;
        if self.originals.len() < self.originals.capacity() * 3 / 4 {
            self.originals.shrink_to_fit();
        }
        self.simplify_original_flag = false;
        if size > j {
            tracing::debug!(removed = size - j, remaining = j, "simplified original clauses");
        }
    }

    /// Attempts to delete about half of the learned clauses, keeping the
    /// most active ones.
    ///
    /// The learned store is sorted ascending by activity; the lower half
    /// loses every clause that is neither locked nor binary, the upper
    /// half additionally requires an activity below
    /// `clause_score_inc / num_learned`. Afterwards the learned-clause
    /// budget grows by its multiplier.
    pub(crate) fn reduce_learned(&mut self) {
        let num_learned = self.learnts.len();
        if num_learned == 0 {
            return;
        }
        let activity_limit = self.cla_inc / num_learned as f64;

        let padded = num_learned.next_power_of_two();
        let mut arr: Vec<Option<ClauseRef>> = Vec::with_capacity(padded);
        let mut scores: Vec<f64> = Vec::with_capacity(padded);
        for &c_ref in &self.learnts {
            arr.push(Some(c_ref));
            scores.push(self.arena[c_ref.0].activity);
        }
        arr.resize(padded, None);
        scores.resize(padded, -100.0);
        sort_clauses_by_scores(&mut arr, &mut scores);

        // the padding sorts below every real activity, so the clauses
        // occupy the tail of the sorted array
        let mut sorted: Vec<ClauseRef> = arr[padded - num_learned..]
            .iter()
            .map(|c| c.expect("padding cannot reach the tail"))
            .collect();
        let sorted_scores = &scores[padded - num_learned..];

        let mut removed_literals = 0;
        let mut j = 0;
        for i in 0..num_learned {
            let c_ref = sorted[i];
            let binary = self.arena[c_ref.0].len() <= 2;
            let deletable = if i < num_learned / 2 {
                !binary && !self.locked(c_ref)
            } else {
                !binary && sorted_scores[i] < activity_limit && !self.locked(c_ref)
            };
            if deletable {
                removed_literals += self.arena[c_ref.0].len() as u64;
                self.remove_clause(c_ref);
            } else {
                sorted[j] = c_ref;
                j += 1;
            }
        }
        sorted.truncate(j);
        self.learnts = sorted;
        self.cur_learned_literals -= removed_literals;
        self.stats.reductions += 1;
        self.max_learned *= self.config.low_level_config().max_learned_multiplier();
        tracing::debug!(
            removed = num_learned - j,
            remaining = j,
            max_learned = self.max_learned,
            "reduced learned clauses"
        );
    }
}

/// Sorts the clause array ascending by score.
///
/// Bottom-up merge sort over buffers of the same power-of-two length,
/// swapping source and target after each pass; the length must be a power
/// of two.
fn sort_clauses_by_scores(arr: &mut Vec<Option<ClauseRef>>, scores: &mut Vec<f64>) {
    let size = arr.len();
    debug_assert!(size.is_power_of_two());
    let mut target: Vec<Option<ClauseRef>> = vec![None; size];
    let mut starget: Vec<f64> = vec![0.0; size];

    let mut block_size = 1;
    while block_size <= size / 2 {
        let mut lindex = 0;
        let mut rindex = block_size;
        let mut l = 0;
        let mut r = 0;
        for j in 0..size {
            if l == block_size && r == block_size {
                // both blocks drained, move to the next pair
                lindex += block_size;
                rindex += block_size;
                l = 0;
                r = 0;
            }
            let take_left = if l == block_size {
                false
            } else if r == block_size {
                true
            } else {
                scores[lindex] < scores[rindex]
            };
            if take_left {
                target[j] = arr[lindex];
                starget[j] = scores[lindex];
                lindex += 1;
                l += 1;
            } else {
                target[j] = arr[rindex];
                starget[j] = scores[rindex];
                rindex += 1;
                r += 1;
            }
        }
        std::mem::swap(arr, &mut target);
        std::mem::swap(scores, &mut starget);
        block_size *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::super::datastructures::ClauseRef;
    use super::sort_clauses_by_scores;

    #[test]
    fn test_sort_by_scores() {
        let mut arr: Vec<Option<ClauseRef>> =
            vec![Some(ClauseRef(0)), Some(ClauseRef(1)), Some(ClauseRef(2)), None];
        let mut scores = vec![3.5, 0.5, 2.0, -100.0];
        sort_clauses_by_scores(&mut arr, &mut scores);
        assert_eq!(scores, vec![-100.0, 0.5, 2.0, 3.5]);
        assert_eq!(arr, vec![None, Some(ClauseRef(1)), Some(ClauseRef(2)), Some(ClauseRef(0))]);
    }

    #[test]
    fn test_sort_single_element() {
        let mut arr = vec![Some(ClauseRef(7))];
        let mut scores = vec![1.25];
        sort_clauses_by_scores(&mut arr, &mut scores);
        assert_eq!(arr, vec![Some(ClauseRef(7))]);
        assert_eq!(scores, vec![1.25]);
    }

    #[test]
    fn test_sort_larger_power_of_two() {
        let mut arr: Vec<Option<ClauseRef>> = (0..8).map(|i| Some(ClauseRef(i))).collect();
        let mut scores = vec![5.0, 1.0, 7.0, 3.0, 0.0, 6.0, 2.0, 4.0];
        sort_clauses_by_scores(&mut arr, &mut scores);
        assert_eq!(scores, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(
            arr,
            vec![
                Some(ClauseRef(4)),
                Some(ClauseRef(1)),
                Some(ClauseRef(6)),
                Some(ClauseRef(3)),
                Some(ClauseRef(7)),
                Some(ClauseRef(0)),
                Some(ClauseRef(5)),
                Some(ClauseRef(2)),
            ]
        );
    }
}

use std::fmt::Debug;

use super::solver_datastructures::{Var, Variable};

/// A binary max-heap over variables, ordered by activity.
///
/// Storage is 1-based: slot 0 of the order array is unused and a position
/// of 0 in the index array means "not in the heap". The solver keeps two
/// instances of this structure, one as the VSIDS variable ordering and one
/// as the implication queue of the propagator.
pub struct ActivityHeap {
    order: Vec<Var>,
    indices: Vec<usize>,
}

impl ActivityHeap {
    /// Creates a heap with room for the variables `1..=var_count`.
    pub fn new(var_count: usize) -> Self {
        let mut order = Vec::with_capacity(var_count + 1);
        order.push(Var(0));
        Self { order, indices: vec![0; var_count + 1] }
    }

    pub fn len(&self) -> usize {
        self.order.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.order.len() == 1
    }

    pub fn in_heap(&self, v: Var) -> bool {
        self.indices[v.0] != 0
    }

    /// Puts a variable in the heap for the first time.
    pub fn insert(&mut self, v: Var, vars: &[Variable]) {
        debug_assert!(!self.in_heap(v));
        self.order.push(v);
        self.indices[v.0] = self.len();
        self.percolate_up(self.len(), vars);
    }

    /// Restores the heap position of a variable whose activity rose.
    ///
    /// Does nothing if the variable is currently not in the heap.
    pub fn update(&mut self, v: Var, vars: &[Variable]) {
        if self.in_heap(v) {
            self.percolate_up(self.indices[v.0], vars);
        }
    }

    /// Puts a variable back in the heap unless it is already present.
    ///
    /// Used by backjumping to return undone variables to the variable
    /// ordering and by the propagator to enqueue pending implications.
    pub fn reinsert(&mut self, v: Var, vars: &[Variable]) {
        if !self.in_heap(v) {
            self.insert(v, vars);
        }
    }

    /// Removes and returns the variable with the highest activity.
    pub fn pop_max(&mut self, vars: &[Variable]) -> Option<Var> {
        if self.is_empty() {
            return None;
        }
        let top = self.order[1];
        let last = self.order.pop().expect("heap is not empty");
        self.indices[top.0] = 0;
        if !self.is_empty() {
            self.order[1] = last;
            self.indices[last.0] = 1;
            if self.len() > 1 {
                self.percolate_down(1, vars);
            }
        }
        Some(top)
    }

    /// Empties the heap.
    pub fn clear(&mut self) {
        for i in 1..self.order.len() {
            self.indices[self.order[i].0] = 0;
        }
        self.order.truncate(1);
    }

    fn gt(v1: Var, v2: Var, vars: &[Variable]) -> bool {
        vars[v1.0].activity > vars[v2.0].activity
    }

    fn percolate_up(&mut self, pos: usize, vars: &[Variable]) {
        let v = self.order[pos];
        let mut i = pos;
        let mut parent = Self::parent(i);
        while parent != 0 && Self::gt(v, self.order[parent], vars) {
            let moved = self.order[parent];
            self.order[i] = moved;
            self.indices[moved.0] = i;
            i = parent;
            parent = Self::parent(i);
        }
        self.order[i] = v;
        self.indices[v.0] = i;
    }

    fn percolate_down(&mut self, pos: usize, vars: &[Variable]) {
        let v = self.order[pos];
        let size = self.len();
        let mut i = pos;
        while Self::left(i) <= size {
            let left = Self::left(i);
            let right = Self::right(i);
            let child = if right <= size && Self::gt(self.order[right], self.order[left], vars) {
                right
            } else {
                left
            };
            if !Self::gt(self.order[child], v, vars) {
                break;
            }
            self.order[i] = self.order[child];
            self.indices[self.order[i].0] = i;
            i = child;
        }
        self.order[i] = v;
        self.indices[v.0] = i;
    }

    const fn left(pos: usize) -> usize {
        pos * 2
    }

    const fn right(pos: usize) -> usize {
        pos * 2 + 1
    }

    const fn parent(pos: usize) -> usize {
        pos / 2
    }
}

impl Debug for ActivityHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActivityHeap{{")?;
        f.debug_list().entries(self.order.iter().skip(1).map(|v| (v.0, self.indices[v.0]))).finish()?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::super::solver_datastructures::{Var, Variable};
    use super::ActivityHeap;

    fn vars_with_activities(activities: &[f64]) -> Vec<Variable> {
        let mut vars = vec![Variable::new()];
        for &a in activities {
            let mut v = Variable::new();
            v.activity = a;
            vars.push(v);
        }
        vars
    }

    #[test]
    fn test_insert_and_pop_order() {
        let vars = vars_with_activities(&[1.0, 5.0, 3.0, 4.0]);
        let mut heap = ActivityHeap::new(4);
        assert!(heap.is_empty());
        for v in 1..=4 {
            heap.insert(Var(v), &vars);
        }
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.pop_max(&vars), Some(Var(2)));
        assert_eq!(heap.pop_max(&vars), Some(Var(4)));
        assert_eq!(heap.pop_max(&vars), Some(Var(3)));
        assert_eq!(heap.pop_max(&vars), Some(Var(1)));
        assert_eq!(heap.pop_max(&vars), None);
    }

    #[test]
    fn test_membership_and_reinsert() {
        let vars = vars_with_activities(&[1.0, 2.0, 3.0]);
        let mut heap = ActivityHeap::new(3);
        heap.insert(Var(1), &vars);
        heap.insert(Var(2), &vars);
        assert!(heap.in_heap(Var(1)));
        assert!(!heap.in_heap(Var(3)));
        heap.reinsert(Var(1), &vars);
        assert_eq!(heap.len(), 2);
        heap.reinsert(Var(3), &vars);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop_max(&vars), Some(Var(3)));
        assert!(!heap.in_heap(Var(3)));
    }

    #[test]
    fn test_update_after_activity_rise() {
        let mut vars = vars_with_activities(&[1.0, 2.0, 3.0]);
        let mut heap = ActivityHeap::new(3);
        for v in 1..=3 {
            heap.insert(Var(v), &vars);
        }
        vars[1].activity = 10.0;
        heap.update(Var(1), &vars);
        assert_eq!(heap.pop_max(&vars), Some(Var(1)));
    }

    #[test]
    fn test_equal_activities_pop_in_insertion_order() {
        let vars = vars_with_activities(&[0.0, 0.0, 0.0]);
        let mut heap = ActivityHeap::new(3);
        for v in 1..=3 {
            heap.insert(Var(v), &vars);
        }
        assert_eq!(heap.pop_max(&vars), Some(Var(1)));
    }

    #[test]
    fn test_clear() {
        let vars = vars_with_activities(&[1.0, 2.0]);
        let mut heap = ActivityHeap::new(2);
        heap.insert(Var(1), &vars);
        heap.insert(Var(2), &vars);
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.in_heap(Var(1)));
        heap.insert(Var(1), &vars);
        assert_eq!(heap.len(), 1);
    }
}

use crate::handlers::{ComputationHandler, SolverEvent};

use super::datastructures::{neg_lit, not, var, ActivityHeap, Clause, ClauseRef, Lit, Tristate, Var, Variable};
use super::{SolverConfig, SolverStats};

/// The answer of a solve call.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Verdict {
    /// A satisfying assignment was found.
    Satisfiable,
    /// The formula has no satisfying assignment.
    Unsatisfiable,
    /// The search was canceled before an answer was found.
    Unknown,
}

/// Returns the i-th element of the Luby sequence `1,1,2,1,1,2,4,...`.
///
/// The i-th restart of the solver fires after `luby_unit * luby(i + 1)`
/// further conflicts.
pub fn luby(i: u64) -> u64 {
    if i == 1 {
        return 1;
    }
    let k = 63 - (i + 1).leading_zeros() as u64;
    if (i + 1).is_power_of_two() {
        1 << (k - 1)
    } else {
        luby(i - (1 << k) + 1)
    }
}

/// A CDCL solver over a fixed set of variables.
///
/// The solver is populated through [`add_clause`](CoreSolver::add_clause)
/// followed by one [`finish_loading`](CoreSolver::finish_loading) call,
/// then decides the instance with [`solve`](CoreSolver::solve).
pub struct CoreSolver {
    pub(crate) config: SolverConfig,

    // internal solver state
    pub(crate) ok: bool,
    pub(crate) var_count: usize,
    pub(crate) vars: Vec<Variable>,
    pub(crate) arena: Vec<Clause>,
    pub(crate) free_slots: Vec<usize>,
    pub(crate) originals: Vec<ClauseRef>,
    pub(crate) learnts: Vec<ClauseRef>,
    pub(crate) watches: Vec<Vec<ClauseRef>>,
    pub(crate) trail: Vec<Lit>,
    pub(crate) level_starts: Vec<usize>,
    pub(crate) decision_level: usize,
    pub(crate) order_heap: ActivityHeap,
    pub(crate) imp_queue: ActivityHeap,
    pub(crate) model: Vec<Lit>,

    // activities
    pub(crate) var_inc: f64,
    pub(crate) cla_inc: f64,

    // conflict-analysis scratch state
    pub(crate) seen: Vec<bool>,
    pub(crate) cdc: Vec<Lit>,
    pub(crate) minimize_stack: Vec<Lit>,
    pub(crate) minimize_undo: Vec<Var>,
    pub(crate) assertion_level: usize,

    // restart policy
    pub(crate) next_restart_conflicts: u64,

    // phase-saving schedule
    pub(crate) save_progress: bool,
    pub(crate) on_threshold: u64,
    pub(crate) off_threshold: u64,
    pub(crate) next_phase_switch: u64,

    // clause-database management
    pub(crate) max_learned: f64,
    pub(crate) simplify_original_flag: bool,
    pub(crate) simplify_learned_flag: bool,
    pub(crate) next_simplify_conflicts: u64,
    pub(crate) next_simplify_increment: u64,
    pub(crate) cur_original_literals: u64,
    pub(crate) cur_learned_literals: u64,

    pub(crate) stats: SolverStats,
    pub(crate) rng: fastrand::Rng,
}

impl CoreSolver {
    /// Constructs a solver for the variables `1..=var_count`.
    pub fn new(var_count: usize, config: SolverConfig) -> Self {
        let vars = vec![Variable::new(); var_count + 1];
        let mut order_heap = ActivityHeap::new(var_count);
        for v in 1..=var_count {
            order_heap.insert(Var(v), &vars);
        }
        let level_cap = if var_count > config.low_level_config().shrink_var_threshold() {
            var_count / 10
        } else {
            var_count
        }
        .max(2);
        let mut level_starts = Vec::with_capacity(level_cap);
        level_starts.push(0);
        level_starts.push(0);
        let scratch_cap = (var_count / 100).max(10);
        let rng = fastrand::Rng::with_seed(config.random_seed());
        Self {
            ok: true,
            var_count,
            vars,
            arena: Vec::new(),
            free_slots: Vec::new(),
            originals: Vec::new(),
            learnts: Vec::new(),
            watches: vec![Vec::new(); 2 * var_count],
            trail: Vec::with_capacity(var_count),
            level_starts,
            decision_level: 1,
            order_heap,
            imp_queue: ActivityHeap::new(var_count),
            model: Vec::new(),
            var_inc: 1.0,
            cla_inc: 1.0,
            seen: vec![false; var_count + 1],
            cdc: Vec::with_capacity((var_count / 100).max(100)),
            minimize_stack: Vec::with_capacity(scratch_cap),
            minimize_undo: Vec::with_capacity(scratch_cap),
            assertion_level: 1,
            next_restart_conflicts: config.low_level_config().luby_unit(),
            save_progress: false,
            on_threshold: config.low_level_config().on_threshold(),
            off_threshold: config.low_level_config().off_threshold(),
            next_phase_switch: config.low_level_config().on_threshold(),
            max_learned: 0.0,
            simplify_original_flag: false,
            simplify_learned_flag: false,
            next_simplify_conflicts: 0,
            next_simplify_increment: 0,
            cur_original_literals: 0,
            cur_learned_literals: 0,
            stats: SolverStats::new(),
            rng,
            config,
        }
    }

    /// The number of variables declared for this solver.
    pub const fn var_count(&self) -> usize {
        self.var_count
    }

    /// Whether no inconsistency has been derived at the root level yet.
    pub const fn ok(&self) -> bool {
        self.ok
    }

    /// The execution statistics of this solver.
    pub const fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// The model of the last successful solve call, one true literal per
    /// variable in variable order.
    pub fn model(&self) -> &[Lit] {
        &self.model
    }

    /// The model of the last successful solve call as signed DIMACS
    /// literals.
    pub fn model_dimacs(&self) -> Vec<i64> {
        self.model.iter().map(|l| l.to_dimacs()).collect()
    }

    pub(crate) fn value(&self, lit: Lit) -> Tristate {
        match self.vars[var(lit).0].status {
            None => Tristate::Undef,
            Some(l) if l == lit => Tristate::True,
            Some(_) => Tristate::False,
        }
    }

    /// Adds an original clause given as signed DIMACS literals.
    ///
    /// Literals already falsified by earlier root facts are dropped,
    /// clauses satisfied at the root are skipped, duplicate literals are
    /// removed, and tautologies are dropped. A surviving unit literal is
    /// enqueued as a root fact to be propagated by
    /// [`finish_loading`](CoreSolver::finish_loading); a clause left empty
    /// marks the instance as trivially unsatisfiable.
    ///
    /// Returns `false` iff the instance is now known to be unsatisfiable.
    pub fn add_clause(&mut self, lits: &[i64]) -> bool {
        debug_assert!(self.decision_level == 1);
        if !self.ok {
            return false;
        }
        let mut ps = Vec::with_capacity(lits.len());
        for &l in lits {
            let lit = Lit::from_dimacs(l);
            match self.value(lit) {
                Tristate::True => return true,
                Tristate::False => {}
                Tristate::Undef => ps.push(l),
            }
        }
        ps.sort_unstable_by_key(|l| l.unsigned_abs());
        let mut clause: Vec<Lit> = Vec::with_capacity(ps.len());
        for &l in &ps {
            let lit = Lit::from_dimacs(l);
            match clause.last() {
                Some(&prev) if prev == lit => {}
                Some(&prev) if prev == not(lit) => return true,
                _ => clause.push(lit),
            }
        }
        if clause.is_empty() {
            self.ok = false;
            return false;
        }
        if clause.len() == 1 {
            self.enqueue_root(clause[0]);
            return true;
        }
        self.cur_original_literals += clause.len() as u64;
        let c_ref = self.alloc_clause(Clause::new(clause, false));
        self.originals.push(c_ref);
        self.attach_clause(c_ref);
        true
    }

    /// Saturates the root facts collected during loading and fixes the
    /// initial learned-clause budget.
    ///
    /// Returns `false` iff unit propagation derives a root conflict.
    pub fn finish_loading(&mut self) -> bool {
        if !self.ok {
            return false;
        }
        if !self.imp_queue.is_empty() {
            self.simplify_original_flag = true;
            self.simplify_learned_flag = true;
            if self.propagate_pending().is_some() {
                self.ok = false;
                return false;
            }
        }
        self.stats.original_clauses = self.originals.len() as u64;
        self.simplify_original();
        self.max_learned = (self.originals.len() / self.config.low_level_config().max_learned_divisor()) as f64;
        true
    }

    /// Assigns a root fact found during loading and queues it for the
    /// post-load saturation.
    fn enqueue_root(&mut self, lit: Lit) {
        let v = var(lit);
        let variable = &mut self.vars[v.0];
        variable.status = Some(lit);
        variable.level = 1;
        variable.reason = None;
        self.trail.push(lit);
        self.imp_queue.reinsert(v, &self.vars);
    }

    pub(crate) fn alloc_clause(&mut self, clause: Clause) -> ClauseRef {
        if let Some(slot) = self.free_slots.pop() {
            self.arena[slot] = clause;
            ClauseRef(slot)
        } else {
            self.arena.push(clause);
            ClauseRef(self.arena.len() - 1)
        }
    }

    /// Registers a non-unit clause on the watched lists of its first two
    /// literals.
    pub(crate) fn attach_clause(&mut self, c_ref: ClauseRef) {
        let clause = &self.arena[c_ref.0];
        debug_assert!(clause.len() > 1);
        let l0 = clause.get(0);
        let l1 = clause.get(1);
        self.watches[l0.watch_index()].push(c_ref);
        self.watches[l1.watch_index()].push(c_ref);
    }

    pub(crate) fn bump_var_activity(&mut self, v: Var) {
        self.vars[v.0].increment_activity(self.var_inc);
        if self.vars[v.0].activity > self.config.low_level_config().score_limit() {
            self.rescale_var_activities();
        }
        self.order_heap.update(v, &self.vars);
    }

    fn rescale_var_activities(&mut self) {
        let divider = self.config.low_level_config().score_divider();
        for variable in &mut self.vars[1..] {
            variable.rescale_activity(divider);
        }
        self.var_inc *= divider;
    }

    pub(crate) fn bump_clause_activity(&mut self, c_ref: ClauseRef) {
        self.arena[c_ref.0].increment_activity(self.cla_inc);
        if self.arena[c_ref.0].activity > self.config.low_level_config().clause_score_limit() {
            let divider = self.config.low_level_config().clause_score_divider();
            for &learnt in &self.learnts {
                self.arena[learnt.0].rescale_activity(divider);
            }
            self.cla_inc *= divider;
        }
    }

    /// Assigns `lit` true and saturates the state under unit propagation.
    ///
    /// The caller must have set the level and reason of `lit`'s variable.
    /// Returns the conflicting clause if propagation runs into one.
    pub(crate) fn propagate(&mut self, lit: Lit) -> Option<ClauseRef> {
        let v = var(lit);
        self.vars[v.0].status = Some(lit);
        self.trail.push(lit);
        self.imp_queue.reinsert(v, &self.vars);
        self.propagate_pending()
    }

    /// Drains the implication queue in activity order, maintaining the
    /// 2-watched-literal invariant.
    pub(crate) fn propagate_pending(&mut self) -> Option<ClauseRef> {
        let slevel = self.decision_level;
        while let Some(v) = self.imp_queue.pop_max(&self.vars) {
            let lit = self.vars[v.0].status.expect("dequeued variable is assigned");
            let false_lit = not(lit);
            let wi = false_lit.watch_index();
            let mut i = 0;
            let mut j = 0;
            'watchers: while i < self.watches[wi].len() {
                let c_ref = self.watches[wi][i];
                i += 1;
                // keep the falsified watch in position 1
                let l1 = self.arena[c_ref.0].get(1);
                if l1 != false_lit {
                    let l0 = self.arena[c_ref.0].get(0);
                    self.arena[c_ref.0].set(0, l1);
                    self.arena[c_ref.0].set(1, l0);
                }
                let first = self.arena[c_ref.0].get(0);
                if self.value(first) == Tristate::True {
                    // clause already satisfied, keep the watch as is
                    self.watches[wi][j] = c_ref;
                    j += 1;
                    continue;
                }
                let size = self.arena[c_ref.0].len();
                for k in 2..size {
                    let candidate = self.arena[c_ref.0].get(k);
                    if self.value(candidate) != Tristate::False {
                        self.arena[c_ref.0].set(1, candidate);
                        self.arena[c_ref.0].set(k, false_lit);
                        self.watches[candidate.watch_index()].push(c_ref);
                        continue 'watchers;
                    }
                }
                // no replacement watch: the clause is unit or conflicting
                if self.value(first) == Tristate::False {
                    self.imp_queue.clear();
                    self.watches[wi][j] = c_ref;
                    j += 1;
                    while i < self.watches[wi].len() {
                        self.watches[wi][j] = self.watches[wi][i];
                        j += 1;
                        i += 1;
                    }
                    self.watches[wi].truncate(j);
                    return Some(c_ref);
                }
                if self.value(first) == Tristate::Undef {
                    let fv = var(first);
                    let variable = &mut self.vars[fv.0];
                    variable.status = Some(first);
                    variable.level = slevel;
                    variable.reason = Some(c_ref);
                    self.trail.push(first);
                    self.imp_queue.reinsert(fv, &self.vars);
                }
                self.watches[wi][j] = c_ref;
                j += 1;
            }
            self.watches[wi].truncate(j);
        }
        None
    }

    /// Analyzes the conflict `confl` at the current decision level.
    ///
    /// Afterwards the learned clause sits in the scratch buffer with the
    /// asserting literal in position 0, and
    /// [`assertion_level`](Self::assertion_level) holds the backjump
    /// target; an assertion level of 0 means the formula is
    /// unsatisfiable. Also drives the phase-saving schedule, which is
    /// clocked by the conflict counter.
    pub(crate) fn analyze(&mut self, confl: ClauseRef) {
        self.update_phase_schedule();
        self.stats.conflicts += 1;
        let clevel = self.decision_level;
        self.assertion_level = self.derive_learned_clause(confl, clevel);
    }

    /// Flips phase saving when the conflict counter crosses the next
    /// switch point and schedules the switch after that.
    pub(crate) fn update_phase_schedule(&mut self) {
        if self.stats.conflicts < self.next_phase_switch {
            return;
        }
        self.save_progress = !self.save_progress;
        let inc = if self.save_progress {
            self.on_threshold += self.config.low_level_config().on_threshold_inc();
            self.off_threshold
        } else {
            self.off_threshold += self.config.low_level_config().off_threshold_inc();
            self.on_threshold
        };
        self.next_phase_switch += inc;
        tracing::debug!(on = self.save_progress, conflicts = self.stats.conflicts, "phase saving toggled");
    }

    /// Derives the first-UIP learned clause and returns its assertion
    /// level (0 for a fatal conflict at the root).
    fn derive_learned_clause(&mut self, conflicting: ClauseRef, clevel: usize) -> usize {
        self.seen.iter_mut().for_each(|s| *s = false);
        self.cdc.clear();
        if clevel <= 1 {
            return 0;
        }
        // slot for the asserting literal, filled once the first UIP is found
        self.cdc.push(Lit::UNDEF);

        let mut confl = conflicting;
        let mut first_run = true;
        let mut lits_at_clevel = 0_usize;
        let mut trail_index = self.trail.len();
        let uip = loop {
            let begin = usize::from(!first_run);
            first_run = false;
            let size = self.arena[confl.0].len();
            for i in begin..size {
                let cur = self.arena[confl.0].get(i);
                let v = var(cur);
                let level = self.vars[v.0].level;
                // literals falsified at the root are resolved away for free
                if !self.seen[v.0] && level > 1 {
                    self.seen[v.0] = true;
                    self.bump_var_activity(v);
                    if level == clevel {
                        lits_at_clevel += 1;
                    } else {
                        self.cdc.push(cur);
                    }
                }
            }
            // find the most recent trail literal involved in the conflict
            loop {
                trail_index -= 1;
                if self.seen[var(self.trail[trail_index]).0] {
                    break;
                }
            }
            let next = self.trail[trail_index];
            let v = var(next);
            self.seen[v.0] = false;
            lits_at_clevel -= 1;
            if let Some(reason) = self.vars[v.0].reason {
                if self.arena[reason.0].learnt {
                    self.bump_clause_activity(reason);
                }
                confl = reason;
            }
            if lits_at_clevel == 0 {
                break next;
            }
        };
        self.cdc[0] = not(uip);
        self.seen[var(uip).0] = true;

        // self-subsuming minimization: a hash of the levels present in the
        // clause rules out most removal candidates quickly
        let mut minl = 0_u32;
        for i in 1..self.cdc.len() {
            let level = self.vars[var(self.cdc[i]).0].level;
            minl |= 1 << (level & 31);
        }
        let mut assertion_level = 1;
        let size = self.cdc.len();
        let mut j = 1;
        for i in 1..size {
            let cur = self.cdc[i];
            let v = var(cur);
            if self.vars[v.0].reason.is_none() || !self.removable(cur, minl) {
                let level = self.vars[v.0].level;
                if level > assertion_level {
                    assertion_level = level;
                }
                self.cdc[j] = cur;
                j += 1;
            }
        }
        self.cdc.truncate(j);
        assertion_level
    }

    /// Returns whether `lit` can be removed from the pending learned
    /// clause without introducing any new literal.
    ///
    /// Resolves `lit` away over its reason, depth first; a predecessor
    /// qualifies only if it has a reason and its level's bit is set in
    /// `minl`. Markers set on success stay in `seen` as a cache for later
    /// probes; on failure only this call's markers are rolled back.
    fn removable(&mut self, lit: Lit, minl: u32) -> bool {
        self.minimize_stack.clear();
        self.minimize_undo.clear();
        self.minimize_stack.push(lit);
        while let Some(cur) = self.minimize_stack.pop() {
            let reason = self.vars[var(cur).0].reason.expect("removal candidates have a reason");
            let size = self.arena[reason.0].len();
            for i in 1..size {
                let pred = self.arena[reason.0].get(i);
                let v = var(pred);
                let level = self.vars[v.0].level;
                if !self.seen[v.0] && level != 1 {
                    if self.vars[v.0].reason.is_some() && minl & (1 << (level & 31)) != 0 {
                        self.seen[v.0] = true;
                        self.minimize_stack.push(pred);
                        self.minimize_undo.push(v);
                    } else {
                        for &u in &self.minimize_undo {
                            self.seen[u.0] = false;
                        }
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Undoes every trail entry at level `dest` and above.
    ///
    /// Afterwards the decision level is `dest - 1`, so the next decision
    /// is made at level `dest`.
    pub(crate) fn backjump(&mut self, dest: usize) {
        if self.decision_level < dest {
            return;
        }
        let target = self.level_starts[dest];
        while self.trail.len() > target {
            let lit = self.trail.pop().expect("trail is non-empty above the target");
            let v = var(lit);
            let variable = &mut self.vars[v.0];
            if self.save_progress {
                variable.saved = Some(lit);
            }
            variable.status = None;
            variable.level = 0;
            variable.reason = None;
            self.order_heap.reinsert(v, &self.vars);
        }
        self.decision_level = dest - 1;
    }

    /// Adds the learned clause of the last analysis to the store and
    /// propagates its asserting literal.
    ///
    /// Must be called after backjumping to the assertion level + 1.
    pub(crate) fn assert_learned(&mut self) -> Option<ClauseRef> {
        let threshold = self.config.low_level_config().shrink_var_threshold();
        if self.var_count > threshold && self.decision_level < self.level_starts.capacity() / 4 {
            self.level_starts.truncate(self.decision_level + 1);
            let half = self.level_starts.capacity() / 2;
            self.level_starts.shrink_to(half);
        }
        let uip = self.cdc[0];
        let uv = var(uip);
        if self.cdc.len() > 1 {
            let c_ref = self.attach_learned_clause();
            self.vars[uv.0].reason = Some(c_ref);
        } else {
            // a unit learned clause becomes a root fact
            self.vars[uv.0].reason = None;
            self.simplify_original_flag = true;
            self.simplify_learned_flag = true;
        }
        self.vars[uv.0].level = self.assertion_level;
        self.var_inc *= 1.0 / self.config.low_level_config().var_decay();
        self.cla_inc *= 1.0 / self.config.low_level_config().clause_decay();
        self.propagate(uip)
    }

    /// Moves the learned clause from the scratch buffer into the store,
    /// watched on the asserting literal and a literal of the assertion
    /// level.
    fn attach_learned_clause(&mut self) -> ClauseRef {
        let mut lits = self.cdc.clone();
        let alevel = self.assertion_level;
        let mut found = false;
        for i in 0..lits.len() {
            let lit = lits[i];
            self.bump_var_activity(var(lit));
            if !found && self.vars[var(lit).0].level == alevel {
                lits.swap(1, i);
                found = true;
            }
        }
        let size = lits.len() as u64;
        let c_ref = self.alloc_clause(Clause::new(lits, true));
        self.attach_clause(c_ref);
        self.learnts.push(c_ref);
        self.stats.learned_clauses += 1;
        self.stats.learned_literals += size;
        self.cur_learned_literals += size;
        self.bump_clause_activity(c_ref);
        c_ref
    }

    /// Makes `lit` the decision of a new level and propagates it.
    fn decide(&mut self, lit: Lit) -> Option<ClauseRef> {
        if self.decision_level > self.stats.max_decision_level {
            self.stats.max_decision_level = self.decision_level;
        }
        self.decision_level += 1;
        self.stats.decisions += 1;
        let v = var(lit);
        self.vars[v.0].level = self.decision_level;
        self.vars[v.0].reason = None;
        if self.decision_level == self.level_starts.len() {
            self.level_starts.push(self.trail.len());
        } else {
            self.level_starts[self.decision_level] = self.trail.len();
        }
        self.propagate(lit)
    }

    /// Returns the free variable with the highest activity, or `None` if
    /// every variable is assigned.
    fn pick_branch_var(&mut self) -> Option<Var> {
        if self.config.random_branching()
            && self.var_count > 0
            && self.rng.f64() < self.config.low_level_config().random_var_freq()
        {
            let v = Var(self.rng.usize(1..=self.var_count));
            if self.vars[v.0].level == 0 {
                return Some(v);
            }
        }
        while let Some(v) = self.order_heap.pop_max(&self.vars) {
            if self.vars[v.0].level == 0 {
                return Some(v);
            }
        }
        None
    }

    /// Chooses the phase of a decision variable: the saved phase while
    /// phase saving is on, the negative literal otherwise.
    pub(crate) fn decision_phase(&self, v: Var) -> Lit {
        match self.vars[v.0].saved {
            Some(lit) if self.save_progress => lit,
            _ => neg_lit(v),
        }
    }

    /// Decides the instance.
    ///
    /// Returns [`Verdict::Unknown`] if the handler cancels the search; the
    /// model of a satisfiable instance is available through
    /// [`model`](Self::model) afterwards.
    pub fn solve(&mut self, handler: &mut dyn ComputationHandler) -> Verdict {
        if !self.ok {
            return Verdict::Unsatisfiable;
        }
        if !handler.should_resume(SolverEvent::SolveStarted) {
            return Verdict::Unknown;
        }
        self.model.clear();
        self.print_progress_header();
        let verdict = self.search(handler);
        self.backjump(2);
        if verdict == Verdict::Unsatisfiable {
            self.ok = false;
        }
        handler.should_resume(SolverEvent::SolveFinished);
        verdict
    }

    /// The main CDCL loop.
    ///
    /// Loop invariant: at the top of each iteration the state is closed
    /// under unit propagation and conflict-free.
    fn search(&mut self, handler: &mut dyn ComputationHandler) -> Verdict {
        loop {
            if self.stats.decisions % 2000 == 0 && !handler.should_resume(SolverEvent::DecisionBatch) {
                self.backjump(2);
                return Verdict::Unknown;
            }
            if self.stats.conflicts >= self.next_restart_conflicts {
                self.print_progress();
                self.backjump(2);
                self.stats.restarts += 1;
                let unit = self.config.low_level_config().luby_unit();
                self.next_restart_conflicts = self.stats.conflicts + unit * luby(self.stats.restarts + 1);
                tracing::debug!(
                    restart = self.stats.restarts,
                    next_at = self.next_restart_conflicts,
                    "restarting"
                );
                self.simplify_original();
            }
            if self.simplify_learned_flag
                && self.decision_level == 1
                && self.stats.conflicts >= self.next_simplify_conflicts
            {
                self.simplify_learned();
            }
            if self.learnts.len() as f64 >= self.max_learned + self.trail.len() as f64 {
                self.reduce_learned();
            }
            let Some(decision_var) = self.pick_branch_var() else {
                self.print_progress();
                self.print_progress_footer();
                self.model = (1..=self.var_count)
                    .map(|v| self.vars[v].status.expect("all variables are assigned in a model"))
                    .collect();
                self.backjump(2);
                return Verdict::Satisfiable;
            };
            let lit = self.decision_phase(decision_var);
            let mut confl = self.decide(lit);
            while let Some(c_ref) = confl {
                self.analyze(c_ref);
                if self.assertion_level == 0 {
                    self.print_progress();
                    self.print_progress_footer();
                    return Verdict::Unsatisfiable;
                }
                self.backjump(self.assertion_level + 1);
                confl = self.assert_learned();
            }
            #[cfg(debug_assertions)]
            self.check_invariants();
        }
    }

    /// Consistency checks over the whole solver state, enabled in debug
    /// builds after each completed propagation round.
    #[cfg(debug_assertions)]
    pub(crate) fn check_invariants(&self) {
        // trail: duplicate-free, statuses and levels consistent
        let mut on_trail = vec![false; self.var_count + 1];
        for &lit in &self.trail {
            let v = var(lit);
            assert!(!on_trail[v.0], "variable {} appears twice on the trail", v.0);
            on_trail[v.0] = true;
            assert_eq!(self.vars[v.0].status, Some(lit));
            assert!(self.vars[v.0].level <= self.decision_level);
        }
        for v in 1..=self.var_count {
            let variable = &self.vars[v];
            assert_eq!(variable.status.is_some(), on_trail[v]);
            // every free variable must be in the variable heap
            if variable.status.is_none() {
                assert!(self.order_heap.in_heap(Var(v)), "free variable {v} missing from the heap");
            }
            // reasons imply their first literal, the rest is false below it
            if let Some(reason) = variable.reason {
                let clause = &self.arena[reason.0];
                assert_eq!(Some(clause.get(0)), variable.status);
                for i in 1..clause.len() {
                    let lit = clause.get(i);
                    assert_eq!(self.value(lit), Tristate::False);
                    assert!(self.vars[var(lit).0].level <= variable.level);
                }
            }
        }
        // every non-unit clause is watched by exactly its first two literals
        for &c_ref in self.originals.iter().chain(&self.learnts) {
            let clause = &self.arena[c_ref.0];
            for i in 0..2 {
                let watch_list = &self.watches[clause.get(i).watch_index()];
                assert_eq!(watch_list.iter().filter(|&&w| w == c_ref).count(), 1);
            }
        }
    }
}

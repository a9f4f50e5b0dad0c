use std::time::Instant;

use super::core_solver::CoreSolver;

/// Execution statistics of a solver.
#[derive(Debug, Clone)]
pub struct SolverStats {
    /// Number of decisions made so far.
    pub decisions: u64,
    /// Number of conflicts encountered so far.
    pub conflicts: u64,
    /// Number of restarts performed so far.
    pub restarts: u64,
    /// Total number of clauses ever learned (deleted ones included).
    pub learned_clauses: u64,
    /// Total number of literals in clauses ever learned.
    pub learned_literals: u64,
    /// The deepest decision level reached.
    pub max_decision_level: usize,
    /// Number of learned-clause reductions.
    pub reductions: u64,
    /// Number of root-level simplifications of the learned store.
    pub simplifications: u64,
    /// Number of original clauses stored at the end of loading.
    pub original_clauses: u64,

    // deltas for the progress table
    previous_decisions: u64,
    previous_conflicts: u64,
    previous_reductions: u64,
    previous_simplifications: u64,
    checkpoint: Instant,
}

impl SolverStats {
    pub fn new() -> Self {
        Self {
            decisions: 0,
            conflicts: 0,
            restarts: 0,
            learned_clauses: 0,
            learned_literals: 0,
            max_decision_level: 0,
            reductions: 0,
            simplifications: 0,
            original_clauses: 0,
            previous_decisions: 0,
            previous_conflicts: 0,
            previous_reductions: 0,
            previous_simplifications: 0,
            checkpoint: Instant::now(),
        }
    }
}

impl Default for SolverStats {
    fn default() -> Self {
        Self::new()
    }
}

const PROGRESS_RULE: &str = "c +----+-----------------+------------------+----------------------------------+---------------------------+-----------+";

impl CoreSolver {
    /// Prints the header of the progress table (verbose mode only).
    pub(crate) fn print_progress_header(&self) {
        if !self.config.verbose() {
            return;
        }
        println!("{PROGRESS_RULE}");
        println!(
            "c | {:<2} | {:<15} | {:<16} | {:<32} | {:<25} | {:<9} |",
            "Re", "Conflicts", "Original", "Learned", "Decisions", "KB"
        );
        println!(
            "c | {:<2} | {:>7} {:>7} | {:>7} {:>8} | {:>7} {:>7} {:>8} {:>7} | {:>7} {:>10} {:>6} | {:>4} {:>4} |",
            "st", "Max", "Actual", "Clauses", "Literals", "Max", "Clauses", "Literals", "LPC", "Total", "Per Sec", "C/D", "Red.", "Sim."
        );
        println!("{PROGRESS_RULE}");
    }

    /// Prints one row of the progress table (verbose mode only).
    pub(crate) fn print_progress(&mut self) {
        if !self.config.verbose() {
            return;
        }
        let now = Instant::now();
        let elapsed = now.duration_since(self.stats.checkpoint).as_secs_f64();
        let cur_decisions = self.stats.decisions - self.stats.previous_decisions;
        let cur_conflicts = self.stats.conflicts - self.stats.previous_conflicts;
        let cur_reductions = self.stats.reductions - self.stats.previous_reductions;
        let cur_simplifications = self.stats.simplifications - self.stats.previous_simplifications;
        self.stats.previous_decisions = self.stats.decisions;
        self.stats.previous_conflicts = self.stats.conflicts;
        self.stats.previous_reductions = self.stats.reductions;
        self.stats.previous_simplifications = self.stats.simplifications;
        self.stats.checkpoint = now;

        let learned_count = self.learnts.len();
        let literals_per_clause = if learned_count == 0 {
            0.0
        } else {
            self.cur_learned_literals as f64 / learned_count as f64
        };
        let decision_rate = if elapsed > 0.0 { cur_decisions as f64 / elapsed } else { 0.0 };
        let conflicts_per_decision =
            if cur_decisions == 0 { 0.0 } else { cur_conflicts as f64 / cur_decisions as f64 };
        println!(
            "c | {:>2} | {:>7} {:>7} | {:>7} {:>8} | {:>7} {:>7} {:>8} {:>7.1} | {:>7} {:>10.2} {:>6.3} | {:>4} {:>4} |",
            self.stats.restarts,
            self.next_restart_conflicts,
            self.stats.conflicts,
            self.originals.len(),
            self.cur_original_literals,
            self.max_learned as u64,
            learned_count,
            self.cur_learned_literals,
            literals_per_clause,
            cur_decisions,
            decision_rate,
            conflicts_per_decision,
            cur_reductions,
            cur_simplifications
        );
    }

    /// Prints the footer of the progress table (verbose mode only).
    pub(crate) fn print_progress_footer(&self) {
        if !self.config.verbose() {
            return;
        }
        println!("{PROGRESS_RULE}");
    }

    /// Prints the final execution statistics as comment lines.
    pub fn print_stats(&self) {
        println!("c CNF stats: ({} vars, {} clauses)", self.var_count, self.stats.original_clauses);
        println!("c Decisions: {}", self.stats.decisions);
        println!("c Conflicts: {}", self.stats.conflicts);
    }
}

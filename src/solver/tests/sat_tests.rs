use crate::handlers::{NopHandler, TimeoutHandler};
use crate::solver::tests::{assert_model_satisfies, generate_pigeon_hole, solver_from, solver_from_with_config};
use crate::solver::{SolverConfig, Verdict};

#[test]
fn test_trivial_sat() {
    let mut solver = solver_from("p cnf 1 1\n1 0\n");
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert_eq!(solver.model_dimacs(), vec![1]);
}

#[test]
fn test_trivial_unsat() {
    let mut solver = solver_from("p cnf 1 2\n1 0\n-1 0\n");
    assert!(!solver.ok());
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Unsatisfiable);
}

#[test]
fn test_tautology_is_dropped() {
    let mut solver = solver_from("p cnf 1 1\n1 -1 0\n");
    assert!(solver.originals.is_empty());
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert_eq!(solver.model().len(), 1);
}

#[test]
fn test_chain_implication_is_solved_by_root_propagation() {
    let dimacs = "p cnf 3 3\n-1 2 0\n-2 3 0\n1 0\n";
    let mut solver = solver_from(dimacs);
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert_eq!(solver.model_dimacs(), vec![1, 2, 3]);
    assert_eq!(solver.stats().decisions, 0);
}

#[test]
fn test_pigeon_hole_3_2_is_unsat() {
    let dimacs = generate_pigeon_hole(2);
    let mut solver = solver_from(&dimacs);
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Unsatisfiable);
    assert!(solver.stats().conflicts > 0);
}

#[test]
fn test_larger_pigeon_holes_are_unsat() {
    for holes in 3..=5 {
        let dimacs = generate_pigeon_hole(holes);
        let mut solver = solver_from(&dimacs);
        assert_eq!(solver.solve(&mut NopHandler), Verdict::Unsatisfiable, "PHP({}, {holes})", holes + 1);
        assert!(solver.stats().learned_clauses > 0);
    }
}

#[test]
fn test_empty_formula_is_sat_with_empty_model() {
    let mut solver = solver_from("p cnf 0 0\n");
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert!(solver.model().is_empty());
}

#[test]
fn test_default_phase_is_negative() {
    let mut solver = solver_from("p cnf 2 1\n1 2 0\n");
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    // the first decision takes the negative phase, forcing the other
    // variable through the clause
    assert_eq!(solver.model_dimacs(), vec![-1, 2]);
}

#[test]
fn test_learned_unit_becomes_root_fact() {
    let dimacs = "p cnf 2 2\n1 2 0\n1 -2 0\n";
    let mut solver = solver_from(dimacs);
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    let model = solver.model_dimacs();
    assert!(model.contains(&1));
    assert_model_satisfies(dimacs, &model);
    // the unit clause learned from the first conflict never enters the
    // learned store
    assert_eq!(solver.stats().learned_clauses, 0);
    assert_eq!(solver.stats().conflicts, 1);
}

#[test]
fn test_satisfiable_instance_has_satisfying_model() {
    let dimacs = "p cnf 6 8\n\
        1 2 3 0\n\
        -1 -2 0\n\
        -2 -3 0\n\
        -1 -3 0\n\
        4 5 6 0\n\
        -4 -5 0\n\
        -5 -6 0\n\
        2 5 -6 0\n";
    let mut solver = solver_from(dimacs);
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert_model_satisfies(dimacs, &solver.model_dimacs());
}

#[test]
fn test_unsat_chain_detected_during_loading() {
    let mut solver = solver_from("p cnf 3 4\n1 0\n-1 2 0\n-2 3 0\n-3 0\n");
    assert!(!solver.ok());
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Unsatisfiable);
}

#[test]
fn test_random_branching_still_solves() {
    let config = SolverConfig::default().with_random_branching(true);
    let dimacs = generate_pigeon_hole(3);
    let mut solver = solver_from_with_config(&dimacs, config);
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Unsatisfiable);

    let sat = "p cnf 4 4\n1 2 0\n-1 3 0\n-3 4 0\n-2 -4 0\n";
    let mut solver = solver_from_with_config(sat, SolverConfig::default().with_random_branching(true));
    assert_eq!(solver.solve(&mut NopHandler), Verdict::Satisfiable);
    assert_model_satisfies(sat, &solver.model_dimacs());
}

#[test]
fn test_exhausted_timeout_reports_unknown() {
    let dimacs = generate_pigeon_hole(7);
    let mut solver = solver_from(&dimacs);
    let mut handler = TimeoutHandler::from_secs(0.0);
    assert_eq!(solver.solve(&mut handler), Verdict::Unknown);
}

#[test]
fn test_quick_instances_do_not_restart() {
    let dimacs = generate_pigeon_hole(2);
    let mut solver = solver_from(&dimacs);
    solver.solve(&mut NopHandler);
    assert!(solver.stats().conflicts < 512);
    assert_eq!(solver.stats().restarts, 0);
}

#[test]
fn test_duplicate_literals_are_removed_at_load() {
    let solver = solver_from("p cnf 2 1\n1 1 2 0\n");
    assert_eq!(solver.originals.len(), 1);
    assert_eq!(solver.arena[solver.originals[0].0].len(), 2);
}

#[test]
fn test_root_satisfied_clauses_are_dropped_at_load() {
    // the unit clause comes first, so the second clause is already
    // satisfied when it is read
    let solver = solver_from("p cnf 2 2\n1 0\n1 2 0\n");
    assert!(solver.originals.is_empty());
}

use crate::io::load_cnf;
use crate::solver::{CoreSolver, SolverConfig};

mod sat_tests;

pub(crate) fn solver_from(dimacs: &str) -> CoreSolver {
    load_cnf(dimacs.as_bytes(), SolverConfig::default()).expect("test input is valid DIMACS")
}

pub(crate) fn solver_from_with_config(dimacs: &str, config: SolverConfig) -> CoreSolver {
    load_cnf(dimacs.as_bytes(), config).expect("test input is valid DIMACS")
}

/// DIMACS encoding of the pigeonhole principle with `holes + 1` pigeons,
/// which is unsatisfiable for every `holes >= 1`.
pub(crate) fn generate_pigeon_hole(holes: usize) -> String {
    let pigeons = holes + 1;
    let var = |pigeon: usize, hole: usize| (pigeon - 1) * holes + hole;
    let mut clauses = Vec::new();
    for p in 1..=pigeons {
        let mut clause = String::new();
        for h in 1..=holes {
            clause.push_str(&format!("{} ", var(p, h)));
        }
        clause.push('0');
        clauses.push(clause);
    }
    for h in 1..=holes {
        for p1 in 1..=pigeons {
            for p2 in (p1 + 1)..=pigeons {
                clauses.push(format!("-{} -{} 0", var(p1, h), var(p2, h)));
            }
        }
    }
    let mut result = format!("p cnf {} {}\n", pigeons * holes, clauses.len());
    for clause in clauses {
        result.push_str(&clause);
        result.push('\n');
    }
    result
}

/// Checks that the model satisfies every clause of the DIMACS input it
/// was computed from.
pub(crate) fn assert_model_satisfies(dimacs: &str, model: &[i64]) {
    for line in dimacs.lines().skip(1) {
        let clause: Vec<i64> = line
            .split_whitespace()
            .map(|t| t.parse().expect("test input literal"))
            .take_while(|&l| l != 0)
            .collect();
        assert!(
            clause.iter().any(|l| model.contains(l)),
            "clause {line:?} is not satisfied by the model {model:?}"
        );
    }
}

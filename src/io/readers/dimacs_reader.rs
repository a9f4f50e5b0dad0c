use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use crate::solver::{CoreSolver, SolverConfig};

/// A line holds at most `MAX_LINE_LEN - 2` bytes.
pub const MAX_LINE_LEN: usize = 100_000;
/// A clause holds at most `MAX_CLAUSE_LEN - 1` literals.
pub const MAX_CLAUSE_LEN: usize = 1025;

/// The ways reading a DIMACS CNF file can fail.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// The input could not be opened or read.
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    /// A line exceeds the maximum length.
    #[error("line {line} exceeds max length of {}", MAX_LINE_LEN - 2)]
    LineTooLong {
        /// 1-based number of the offending line.
        line: u64,
    },
    /// A clause holds more than the maximum number of literals.
    #[error("clause at line {line} exceeds maximum length")]
    ClauseTooLong {
        /// 1-based number of the offending line.
        line: u64,
    },
    /// A clause line contains something other than a signed integer.
    #[error("parse error: unexpected token '{token}' at line {line}")]
    UnexpectedToken {
        /// 1-based number of the offending line.
        line: u64,
        /// The token that failed to parse.
        token: String,
    },
    /// A clause line is not terminated by 0.
    #[error("clause at line {line} is not terminated by 0")]
    UnterminatedClause {
        /// 1-based number of the offending line.
        line: u64,
    },
    /// A literal names a variable outside the declared range.
    #[error("literal {literal} at line {line} is out of the declared variable range")]
    VariableOutOfRange {
        /// 1-based number of the offending line.
        line: u64,
        /// The offending literal.
        literal: i64,
    },
    /// The `p cnf` preamble is malformed.
    #[error("malformed preamble at line {line}: {content}")]
    MalformedHeader {
        /// 1-based number of the offending line.
        line: u64,
        /// The preamble line as read.
        content: String,
    },
    /// A clause appears before the `p cnf` preamble, or the input ends
    /// without one.
    #[error("missing 'p cnf' preamble")]
    MissingPreamble,
    /// A line starts with an unexpected character.
    #[error("unknown line {line}: {content}")]
    UnknownLine {
        /// 1-based number of the offending line.
        line: u64,
        /// The line as read.
        content: String,
    },
}

/// Reads a DIMACS CNF file into a solver ready to be solved.
///
/// See [`load_cnf`] for the accepted format.
pub fn read_cnf<P: AsRef<Path>>(file_path: P, config: SolverConfig) -> Result<CoreSolver, DimacsError> {
    let file = File::open(file_path)?;
    load_cnf(BufReader::new(file), config)
}

/// Reads DIMACS CNF input into a solver ready to be solved.
///
/// The reader expects a `p cnf <vars> <clauses>` preamble as the first
/// meaningful line and one `0`-terminated clause per line. Lines starting
/// with `c` (and, historically, `0`) are comments; a line starting with
/// `%` ends the input. Load-time reasoning is applied to each clause:
/// duplicate literals are dropped, clauses containing a variable and its
/// negation are dropped, literals falsified by earlier unit clauses are
/// removed, and surviving unit literals become root facts. The root facts
/// are propagated to saturation before the solver is returned, so a
/// trivially unsatisfiable instance is already flagged as such.
///
/// # Example
///
/// Assume there is the following DIMACS CNF file at `path/to/formula.cnf`:
///
/// ```text
/// c Some description
/// p cnf 5 3
/// -4 1 3 0
/// 2 -1 5 4 0
/// -3 0
/// ```
///
/// ```no_run
/// # use ferrosat::io::read_cnf;
/// # use ferrosat::solver::SolverConfig;
/// let solver = read_cnf("path/to/formula.cnf", SolverConfig::default()).expect("Could not read the file");
/// assert_eq!(solver.var_count(), 5);
/// ```
pub fn load_cnf<R: BufRead>(reader: R, config: SolverConfig) -> Result<CoreSolver, DimacsError> {
    let whitespace = Regex::new(r"[ \t]+").expect("the split pattern is valid");
    let mut solver: Option<CoreSolver> = None;
    let mut literals: Vec<i64> = Vec::with_capacity(MAX_CLAUSE_LEN);
    let mut line_number = 0_u64;
    for read in reader.lines() {
        let line = read?;
        line_number += 1;
        if line.len() > MAX_LINE_LEN - 2 {
            return Err(DimacsError::LineTooLong { line: line_number });
        }
        let content = line.trim();
        let Some(first) = content.chars().next() else {
            continue;
        };
        match first {
            'c' | '0' => {}
            '%' => break,
            'p' => {
                solver = Some(parse_preamble(content, line_number, config.clone())?);
            }
            '-' | '1'..='9' => {
                let Some(solver) = solver.as_mut() else {
                    return Err(DimacsError::MissingPreamble);
                };
                parse_clause(&whitespace, content, line_number, solver.var_count(), &mut literals)?;
                solver.add_clause(&literals);
            }
            _ => {
                return Err(DimacsError::UnknownLine { line: line_number, content: content.to_string() });
            }
        }
    }
    let mut solver = solver.ok_or(DimacsError::MissingPreamble)?;
    solver.finish_loading();
    Ok(solver)
}

fn parse_preamble(content: &str, line: u64, config: SolverConfig) -> Result<CoreSolver, DimacsError> {
    let malformed = || DimacsError::MalformedHeader { line, content: content.to_string() };
    let mut tokens = content.split_ascii_whitespace();
    if tokens.next() != Some("p") || tokens.next() != Some("cnf") {
        return Err(malformed());
    }
    let var_count: usize = tokens.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
    let _clause_count: usize = tokens.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok(CoreSolver::new(var_count, config))
}

fn parse_clause(
    whitespace: &Regex,
    content: &str,
    line: u64,
    var_count: usize,
    literals: &mut Vec<i64>,
) -> Result<(), DimacsError> {
    literals.clear();
    for token in whitespace.split(content) {
        if token.is_empty() {
            continue;
        }
        let literal: i64 = token
            .parse()
            .map_err(|_| DimacsError::UnexpectedToken { line, token: token.to_string() })?;
        if literal == 0 {
            return Ok(());
        }
        if literal.unsigned_abs() as usize > var_count {
            return Err(DimacsError::VariableOutOfRange { line, literal });
        }
        if literals.len() >= MAX_CLAUSE_LEN - 1 {
            return Err(DimacsError::ClauseTooLong { line });
        }
        literals.push(literal);
    }
    Err(DimacsError::UnterminatedClause { line })
}

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::solver::{Lit, Verdict};

/// Writes the verdict to a result file.
///
/// A satisfiable result is written as `SAT` followed by a line of
/// space-separated signed literals terminated by `0`; an unsatisfiable
/// result as `UNSAT`. An unknown verdict leaves the file empty.
pub fn write_result<P: AsRef<Path>>(path: P, verdict: Verdict, model: &[Lit]) -> io::Result<()> {
    let mut file = File::create(path)?;
    match verdict {
        Verdict::Satisfiable => {
            writeln!(file, "SAT")?;
            for (i, lit) in model.iter().enumerate() {
                if i > 0 {
                    write!(file, " ")?;
                }
                write!(file, "{}", lit.to_dimacs())?;
            }
            writeln!(file, " 0")?;
        }
        Verdict::Unsatisfiable => writeln!(file, "UNSAT")?,
        Verdict::Unknown => {}
    }
    Ok(())
}

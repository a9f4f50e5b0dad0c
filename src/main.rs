//! The command-line frontend of the solver.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ferrosat::handlers::{NopHandler, TimeoutHandler};
use ferrosat::io::{read_cnf, write_result};
use ferrosat::solver::{SolverConfig, Verdict};

const EXIT_SAT: u8 = 10;
const EXIT_UNSAT: u8 = 20;
const EXIT_UNKNOWN: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "ferrosat", version, about = "Solve the SAT problem specified in a DIMACS CNF file")]
struct Cli {
    /// Path to the DIMACS CNF input file
    input: PathBuf,

    /// Time-out. Stop and return UNKNOWN after the given number of seconds
    #[arg(short = 't', value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Solution. Print out the satisfying assignment if one is found
    #[arg(short = 's')]
    solution: bool,

    /// Quiet. Do not print out the answer line. Suppresses -s
    #[arg(short = 'q')]
    quiet: bool,

    /// Verbose. Print out a progress table during the search
    #[arg(short = 'v')]
    verbose: bool,

    /// Write `SAT` (with the model) or `UNSAT` to a result file
    #[arg(short = 'r', value_name = "PATH")]
    result: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    ExitCode::from(run(&cli))
}

fn run(cli: &Cli) -> u8 {
    let quiet = cli.quiet;
    if !quiet {
        println!("c ferrosat version {}", env!("CARGO_PKG_VERSION"));
        if let Some(timeout) = cli.timeout {
            println!("c time out set to {timeout:.4} seconds");
        }
    }
    let config = SolverConfig::default().with_verbose(cli.verbose && !quiet);
    let start = Instant::now();
    let mut solver = match read_cnf(&cli.input, config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("{e}");
            return EXIT_ERROR;
        }
    };
    let verdict = match cli.timeout {
        Some(seconds) => {
            let mut handler = TimeoutHandler::from_secs(seconds);
            solver.solve(&mut handler)
        }
        None => solver.solve(&mut NopHandler),
    };
    report(cli, &solver, verdict, start)
}

fn report(cli: &Cli, solver: &ferrosat::solver::CoreSolver, verdict: Verdict, start: Instant) -> u8 {
    if let Some(path) = &cli.result {
        if let Err(e) = write_result(path, verdict, solver.model()) {
            eprintln!("error writing result file: {e}");
        }
    }
    let code = match verdict {
        Verdict::Satisfiable => {
            if !cli.quiet {
                println!("s SATISFIABLE");
                if cli.solution {
                    print_model(solver.model_dimacs());
                }
            }
            EXIT_SAT
        }
        Verdict::Unsatisfiable => {
            if !cli.quiet {
                println!("s UNSATISFIABLE");
            }
            EXIT_UNSAT
        }
        Verdict::Unknown => {
            // a time-out is always reported, even in quiet mode
            println!("s UNKNOWN");
            EXIT_UNKNOWN
        }
    };
    if !cli.quiet {
        solver.print_stats();
        println!("c Running time: {:.5} seconds", start.elapsed().as_secs_f64());
    }
    code
}

fn print_model(model: Vec<i64>) {
    print!("v");
    for lit in model {
        print!(" {lit}");
    }
    println!(" 0");
}

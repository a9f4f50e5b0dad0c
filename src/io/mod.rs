mod readers;
mod writers;

pub use readers::dimacs_reader::*;
pub use writers::result_writer::*;

pub(crate) mod dimacs_reader;

pub(crate) mod result_writer;

pub(crate) mod write_or_append_to_file;

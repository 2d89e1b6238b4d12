use mycelium_base::utils::errors::{execution_err, MappedErrors};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};
use tracing::error;

/// A general purpose function to write or append to a file.
///
/// The returned writer can be called several times with clones of the file
/// handle, keeping the file open between batches.
pub(crate) fn write_or_append_to_file(
    output_file: &Path,
) -> Result<(fn(&[u8], File) -> Result<(), MappedErrors>, File), MappedErrors>
{
    fn builder(output_file: &Path) -> Result<File, MappedErrors> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_file)
            .map_err(|err| {
                execution_err(format!(
                    "Unable to open file {output_file:?}: {err}"
                ))
            })
    }

    fn writer(content: &[u8], mut builder: File) -> Result<(), MappedErrors> {
        if let Err(err) = builder.write_all(content) {
            error!("Unexpected error detected: {}", err);
            return execution_err(format!(
                "Unexpected error detected on write file: {err}",
            ))
            .as_error();
        };

        Ok(())
    }

    Ok((writer, builder(output_file)?))
}

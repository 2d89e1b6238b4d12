mod load_alignment;
mod load_samples;

pub use load_alignment::*;
pub use load_samples::*;

use tracing::debug;

/// Get the command line arguments.
#[tracing::instrument(name = "Runtime arguments")]
pub fn expose_runtime_arguments() {
    let args: Vec<_> = std::env::args().collect();
    debug!("{:?}", args.join(" "));
}

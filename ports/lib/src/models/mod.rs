mod log_format;
mod sampler_config;

pub use log_format::*;
pub use sampler_config::*;

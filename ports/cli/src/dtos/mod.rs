pub(crate) mod distribution_arguments;
pub(crate) mod output_format;
pub(crate) mod telemetry_code;

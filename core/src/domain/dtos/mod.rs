pub mod alphabet;
pub mod branch_length;
pub mod chain_config;
pub mod clade;
pub mod errors;
pub mod likelihood;
pub mod output_format;
pub mod sequence;
pub mod substitution_model;
pub mod traversal;
pub mod tree;
pub mod walker;

pub(crate) mod telemetry_code;

use anyhow::{bail, Result};
use phylomc_core::domain::dtos::{
    branch_length::BranchLengthDistribution, chain_config::ChainConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A sampling run as described in a YAML file.
///
/// ```yaml
/// outgroup: D
/// distribution:
///   distribution: exponential
///   scale: 0.1
/// chain:
///   nwalkers: 4
///   nsteps: 1000
///   burnIn: 200
///   saveFrequency: 10
///   seed: 42
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerConfig {
    /// Name of the terminal used to root every walker tree.
    pub outgroup: String,

    /// Prior over branch lengths, also used to draw proposal lengths.
    pub distribution: BranchLengthDistribution,

    pub chain: ChainConfig,
}

impl SamplerConfig {
    pub fn from_yaml_file(file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: SamplerConfig = serde_yaml::from_str(content)?;

        if let Err(err) = config.chain.validate() {
            bail!("Invalid chain configuration: {err}");
        }

        Ok(config)
    }
}

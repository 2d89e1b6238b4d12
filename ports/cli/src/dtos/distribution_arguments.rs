use anyhow::Result;
use clap::Args;
use phylomc_core::domain::dtos::branch_length::{
    BranchLengthDistribution, DistributionParams,
};

/// Branch length distribution flags shared by commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct DistributionArguments {
    /// Branch length distribution
    ///
    /// Either `exponential` (requires --scale) or `uniform` (requires --low
    /// and --high).
    #[arg(long)]
    pub(crate) distribution: Option<String>,

    /// Scale (mean) of the exponential distribution
    #[arg(long)]
    pub(crate) scale: Option<f64>,

    /// Lower bound of the uniform distribution
    #[arg(long)]
    pub(crate) low: Option<f64>,

    /// Upper bound of the uniform distribution
    #[arg(long)]
    pub(crate) high: Option<f64>,
}

impl DistributionArguments {
    /// The distribution described by the flags, if any was given.
    ///
    /// A bare --scale implies the exponential distribution and bare bounds
    /// imply the uniform one.
    pub(crate) fn resolve(&self) -> Result<Option<BranchLengthDistribution>> {
        let distribution = match &self.distribution {
            Some(name) => name.to_owned(),
            None if self.scale.is_some() => "exponential".to_string(),
            None if self.low.is_some() || self.high.is_some() => {
                "uniform".to_string()
            }
            None => return Ok(None),
        };

        let params = DistributionParams {
            distribution,
            scale: self.scale,
            low: self.low,
            high: self.high,
        };

        let distribution = BranchLengthDistribution::try_from(params)?;

        Ok(Some(distribution))
    }

    /// The distribution described by the flags, or exponential(0.1).
    pub(crate) fn resolve_or_default(
        &self,
    ) -> Result<BranchLengthDistribution> {
        match self.resolve()? {
            Some(distribution) => Ok(distribution),
            None => Ok(BranchLengthDistribution::exponential(0.1)?),
        }
    }
}

use crate::dtos::{
    distribution_arguments::DistributionArguments,
    telemetry_code::TelemetryCode,
};

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use phylomc_core::{
    domain::dtos::{
        chain_config::ChainConfig, likelihood::EvolutionModel,
        output_format::OutputFormat,
    },
    use_cases::{initialize_walkers, run_mcmc, write_samples},
};
use phylomc_ports_lib::{load_alignment, SamplerConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub(crate) struct Arguments {
    /// Path to the alignment file
    ///
    /// The file should be in FASTA format. Headers name the taxa.
    pub(super) alignment_file_path: PathBuf,

    /// Path to the run configuration
    ///
    /// A YAML file with the outgroup, the branch length distribution and the
    /// chain configuration. Flags given in the command line take precedence.
    #[arg(short, long)]
    pub(super) config_file_path: Option<PathBuf>,

    /// Output file path
    ///
    /// The extension is set from the output format.
    #[arg(short, long)]
    pub(super) output_file_path: PathBuf,

    /// Output format
    ///
    /// The format in which the sampled trees will be serialized.
    #[arg(long, default_value = "newick")]
    pub(super) out_format: OutputFormat,

    /// Path to the chain trace file
    ///
    /// When given, the per walker acceptance and log-likelihood traces are
    /// written to this file in YAML format.
    #[arg(long)]
    pub(super) trace_file_path: Option<PathBuf>,

    /// Outgroup taxon used to root every walker tree
    #[arg(long)]
    pub(super) outgroup: Option<String>,

    #[command(flatten)]
    pub(super) distribution: DistributionArguments,

    /// Number of independent walkers
    #[arg(long)]
    pub(super) nwalkers: Option<usize>,

    /// Number of NNI steps per walker
    #[arg(long)]
    pub(super) nsteps: Option<usize>,

    /// Number of initial steps never saved
    #[arg(long)]
    pub(super) burn_in: Option<usize>,

    /// Save one tree every `save_frequency` steps after the burn-in
    #[arg(long)]
    pub(super) save_frequency: Option<usize>,

    /// Seed of the random generators
    #[arg(long)]
    pub(super) seed: Option<u64>,

    /// Force overwrite
    ///
    /// If the output file already exists, it will be overwritten.
    #[arg(short, long, default_value = "false")]
    pub(super) force_overwrite: bool,
}

/// Merge the configuration file with the command line flags.
fn resolve_config(args: &Arguments) -> Result<SamplerConfig> {
    let from_file = match &args.config_file_path {
        Some(path) => Some(SamplerConfig::from_yaml_file(path)?),
        None => None,
    };

    let outgroup = match (&args.outgroup, &from_file) {
        (Some(outgroup), _) => outgroup.to_owned(),
        (None, Some(config)) => config.outgroup.to_owned(),
        (None, None) => bail!("An outgroup is required: use --outgroup"),
    };

    let distribution = match (args.distribution.resolve()?, &from_file) {
        (Some(distribution), _) => distribution,
        (None, Some(config)) => config.distribution,
        (None, None) => args.distribution.resolve_or_default()?,
    };

    let base = from_file.map(|config| config.chain).unwrap_or(ChainConfig {
        nwalkers: 1,
        nsteps: 1000,
        burn_in: 100,
        save_frequency: 10,
        seed: None,
    });

    let chain = ChainConfig {
        nwalkers: args.nwalkers.unwrap_or(base.nwalkers),
        nsteps: args.nsteps.unwrap_or(base.nsteps),
        burn_in: args.burn_in.unwrap_or(base.burn_in),
        save_frequency: args.save_frequency.unwrap_or(base.save_frequency),
        seed: args.seed.or(base.seed),
    };

    if let Err(err) = chain.validate() {
        bail!("Invalid chain configuration: {err}");
    }

    Ok(SamplerConfig {
        outgroup,
        distribution,
        chain,
    })
}

pub(crate) fn sample_cmd(args: Arguments, threads: usize) -> Result<()> {
    // ? -----------------------------------------------------------------------
    // ? Create a thread pool configured globally
    // ? -----------------------------------------------------------------------

    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        bail!("Error creating thread pool: {err}");
    };

    // ? -----------------------------------------------------------------------
    // ? Initialize the walkers
    // ? -----------------------------------------------------------------------

    let config = resolve_config(&args)?;
    let sequences = load_alignment(&args.alignment_file_path)?;
    let model = EvolutionModel::default();

    let mut rng = match config.chain.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let walkers = initialize_walkers(
        &sequences,
        &config.outgroup,
        &config.distribution,
        &model,
        config.chain.nwalkers,
        &mut rng,
    )
    .map_err(|err| anyhow!("{err}"))?;

    //
    // Walker streams are derived from the initialization stream so both
    // never overlap.
    //
    let chain = ChainConfig {
        seed: config.chain.seed.map(|_| rng.gen()),
        ..config.chain.to_owned()
    };

    // ? -----------------------------------------------------------------------
    // ? Run the chains
    // ? -----------------------------------------------------------------------

    let mut summaries = run_mcmc(walkers, &chain, &config.distribution, &model)
        .map_err(|err| anyhow!("{err}"))?;

    for summary in summaries.iter() {
        info!(
            code = TelemetryCode::CLISAMPLE0001.to_string(),
            walker = summary.walker,
            accepted = summary.accepted,
            acceptance_ratio = summary.acceptance_ratio,
            final_log_likelihood = ?summary.final_log_likelihood(),
            samples = summary.samples.len(),
            "Walker summary"
        );
    }

    let out_path = write_samples(
        summaries.iter().flat_map(|summary| summary.samples.iter()),
        &args.output_file_path,
        &args.out_format,
        args.force_overwrite,
    )
    .map_err(|err| anyhow!("{err}"))?;

    if let Some(trace_path) = &args.trace_file_path {
        summaries
            .iter_mut()
            .for_each(|summary| summary.samples.clear());

        std::fs::write(trace_path, serde_yaml::to_string(&summaries)?)?;
    }

    info!(
        code = TelemetryCode::CLISAMPLE0002.to_string(),
        path = ?out_path,
        "Samples written"
    );

    Ok(())
}

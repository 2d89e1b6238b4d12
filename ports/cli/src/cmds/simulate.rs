use crate::dtos::{
    distribution_arguments::DistributionArguments,
    telemetry_code::TelemetryCode,
};

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use phylomc_core::{
    domain::dtos::{likelihood::EvolutionModel, tree::BranchLengthMode},
    use_cases::simulate_artificial_data,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{fs::write, path::PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
pub(crate) struct Arguments {
    /// Output path prefix
    ///
    /// The alignment is written to `<prefix>.fasta`, the true tree to
    /// `<prefix>.nwk` and the full tree with ancestral sequences to
    /// `<prefix>.yaml`.
    pub(super) output_prefix: PathBuf,

    /// Number of taxa
    #[arg(short, long, default_value = "10")]
    pub(super) n_taxa: usize,

    /// Number of sites of every sequence
    #[arg(short, long, default_value = "500")]
    pub(super) seq_len: usize,

    /// Outgroup taxon
    ///
    /// Taxa are named S0, S1, ...
    #[arg(long, default_value = "S0")]
    pub(super) outgroup: String,

    #[command(flatten)]
    pub(super) distribution: DistributionArguments,

    /// How branch lengths are assigned
    #[arg(long, default_value = "free")]
    pub(super) mode: BranchLengthMode,

    /// Seed of the random generator
    #[arg(long)]
    pub(super) seed: Option<u64>,

    /// Force overwrite
    ///
    /// If an output file already exists, it will be overwritten.
    #[arg(short, long, default_value = "false")]
    pub(super) force_overwrite: bool,
}

pub(crate) fn simulate_cmd(args: Arguments) -> Result<()> {
    let fasta_path = args.output_prefix.with_extension("fasta");
    let newick_path = args.output_prefix.with_extension("nwk");
    let yaml_path = args.output_prefix.with_extension("yaml");

    for path in [&fasta_path, &newick_path, &yaml_path] {
        if path.exists() && !args.force_overwrite {
            bail!(
                "Could not overwrite existing file {:?} when overwrite \
                option is `false`.",
                path
            );
        }
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let data = simulate_artificial_data(
        args.n_taxa,
        args.seq_len,
        &args.outgroup,
        &args.distribution.resolve_or_default()?,
        args.mode,
        &EvolutionModel::default(),
        &mut rng,
    )
    .map_err(|err| anyhow!("{err}"))?;

    let fasta = data
        .sequences
        .iter()
        .map(|sequence| sequence.to_fasta())
        .collect::<String>();

    write(&fasta_path, fasta)?;
    write(&newick_path, format!("{}\n", data.true_tree.to_newick()))?;
    write(&yaml_path, serde_yaml::to_string(&data.true_tree)?)?;

    info!(
        code = TelemetryCode::CLISIM0001.to_string(),
        n_taxa = args.n_taxa,
        seq_len = args.seq_len,
        total_length = data.true_tree.total_length(),
        "Simulated data written to {:?}",
        args.output_prefix
    );

    Ok(())
}

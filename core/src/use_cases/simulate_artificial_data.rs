use crate::domain::dtos::{
    branch_length::BranchLengthDistribution,
    likelihood::EvolutionModel,
    sequence::Sequence,
    telemetry_code::TelemetryCode,
    tree::{BranchLengthMode, Tree},
};

use mycelium_base::utils::errors::{use_case_err, MappedErrors};
use rand::Rng;
use tracing::debug;

/// A known tree together with the terminal sequences evolved along it.
#[derive(Clone, Debug)]
pub struct ArtificialData {
    /// The generating tree, with simulated ancestral sequences on every
    /// clade.
    pub true_tree: Tree,

    pub sequences: Vec<Sequence>,
}

/// Simulate an alignment on a random tree.
///
/// Taxa are named `S0`, `S1`, ... and the tree is rooted on `outgroup`.
/// Branch lengths are drawn from `distribution`, then a uniform root
/// sequence of `seq_len` symbols is evolved down the tree under the
/// substitution model.
#[tracing::instrument(
    name = "SimulatingArtificialData",
    skip(distribution, model, rng)
)]
pub fn simulate_artificial_data<R: Rng + ?Sized>(
    n_taxa: usize,
    seq_len: usize,
    outgroup: &str,
    distribution: &BranchLengthDistribution,
    mode: BranchLengthMode,
    model: &EvolutionModel,
    rng: &mut R,
) -> Result<ArtificialData, MappedErrors> {
    if seq_len == 0 {
        return use_case_err("Sequence length should be greater than 0")
            .as_error();
    }

    let mut true_tree = Tree::generate_random_topology(None, Some(n_taxa), rng)
        .map_err(|err| use_case_err(err.to_string()))?;

    true_tree
        .root_with_outgroup(outgroup)
        .map_err(|err| use_case_err(err.to_string()))?;

    true_tree.name = "true".to_string();
    true_tree.generate_random_branch_lengths(distribution, mode, rng);

    true_tree
        .generate_sequences(seq_len, &model.codec, &model.substitution, rng)
        .map_err(|err| use_case_err(err.to_string()))?;

    let sequences = true_tree.terminal_sequences();

    debug!(
        code = TelemetryCode::UCINIT0002.to_string(),
        n_taxa = true_tree.n_taxa(),
        total_length = true_tree.total_length(),
        "Artificial data simulated"
    );

    Ok(ArtificialData {
        true_tree,
        sequences,
    })
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

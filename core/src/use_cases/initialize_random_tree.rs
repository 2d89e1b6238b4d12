use super::calculate_likelihood;
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

/// Build a walker starting tree over the taxa of `sequences`.
///
/// The tree is a random topology rooted on `outgroup`, with branch lengths
/// drawn from `distribution` and the observed sequences clamped to its
/// terminals by name. The log-likelihood is computed before returning, so the
/// tree is ready to enter a chain.
#[tracing::instrument(name = "InitializingRandomTree", skip_all)]
pub fn initialize_random_tree<R: Rng + ?Sized>(
    sequences: &[Sequence],
    outgroup: &str,
    distribution: &BranchLengthDistribution,
    model: &EvolutionModel,
    rng: &mut R,
) -> Result<Tree, MappedErrors> {
    let taxa_names = sequences
        .iter()
        .map(|sequence| sequence.header_content().to_string())
        .collect::<Vec<_>>();

    let mut tree = Tree::generate_random_topology(Some(taxa_names), None, rng)
        .map_err(|err| use_case_err(err.to_string()))?;

    tree.root_with_outgroup(outgroup)
        .map_err(|err| use_case_err(err.to_string()))?;

    tree.generate_random_branch_lengths(
        distribution,
        BranchLengthMode::Free,
        rng,
    );

    tree.clamp_sequences(sequences, &model.codec)
        .map_err(|err| use_case_err(err.to_string()))?;

    let likelihood = calculate_likelihood(&mut tree, model)
        .map_err(|err| use_case_err(err.to_string()))?;

    debug!(
        code = TelemetryCode::UCINIT0001.to_string(),
        n_taxa = tree.n_taxa(),
        log_likelihood = likelihood.log_likelihood,
        "Random tree initialized"
    );

    Ok(tree)
}

/// Build one independent starting tree per walker.
pub fn initialize_walkers<R: Rng + ?Sized>(
    sequences: &[Sequence],
    outgroup: &str,
    distribution: &BranchLengthDistribution,
    model: &EvolutionModel,
    nwalkers: usize,
    rng: &mut R,
) -> Result<Vec<Tree>, MappedErrors> {
    (0..nwalkers)
        .map(|_| {
            initialize_random_tree(
                sequences,
                outgroup,
                distribution,
                model,
                &mut *rng,
            )
        })
        .collect()
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::traversal::RootedTopology;
    use rand::{rngs::StdRng, SeedableRng};

    fn sequences() -> Vec<Sequence> {
        vec![
            Sequence::new("A", "ACGTACGTAA"),
            Sequence::new("B", "ACGTACGTAC"),
            Sequence::new("C", "ACTTACGGAC"),
            Sequence::new("D", "TCTTAGGGAC"),
            Sequence::new("E", "TCTTAGGGTC"),
        ]
    }

    #[test]
    fn test_initialized_tree_is_ready_for_a_chain() {
        let mut rng = StdRng::seed_from_u64(42);
        let distribution = BranchLengthDistribution::exponential(0.1).unwrap();

        let tree = initialize_random_tree(
            &sequences(),
            "E",
            &distribution,
            &EvolutionModel::default(),
            &mut rng,
        )
        .unwrap();

        let outgroup = tree.terminal_by_name("E").unwrap();

        assert_eq!(tree.n_taxa(), 5);
        assert_eq!(tree.get_parent(outgroup), Some(tree.root()));
        assert!(tree.log_likelihood().unwrap().is_finite());
        assert!(tree.terminals().iter().all(|id| {
            tree.clade(*id).sequence.is_some()
                && tree.clade(*id).length.unwrap() > 0.0
        }));
    }

    #[test]
    fn test_walkers_are_independent() {
        let mut rng = StdRng::seed_from_u64(42);

        let walkers = initialize_walkers(
            &sequences(),
            "A",
            &BranchLengthDistribution::uniform(0.01, 0.5).unwrap(),
            &EvolutionModel::default(),
            4,
            &mut rng,
        )
        .unwrap();

        assert_eq!(walkers.len(), 4);
        assert!(walkers
            .windows(2)
            .any(|pair| pair[0].total_length() != pair[1].total_length()));
    }

    #[test]
    fn test_unknown_outgroup_fails() {
        let mut rng = StdRng::seed_from_u64(42);

        assert!(initialize_random_tree(
            &sequences(),
            "Z",
            &BranchLengthDistribution::exponential(0.1).unwrap(),
            &EvolutionModel::default(),
            &mut rng,
        )
        .is_err());
    }
}

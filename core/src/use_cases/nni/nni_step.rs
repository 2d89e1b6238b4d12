use super::{
    eligible_nodes::eligible_nodes, generate_topology::generate_topology,
    permutable_nodes::permutable_nodes,
};
use crate::{
    domain::dtos::{
        branch_length::BranchLengthDistribution,
        errors::PhyloError,
        likelihood::EvolutionModel,
        telemetry_code::TelemetryCode,
        tree::{BranchLengthMode, Tree},
        walker::NniOutcome,
    },
    use_cases::calculate_likelihood,
};

use rand::{seq::SliceRandom, Rng};
use tracing::trace;

/// Metropolis-Hastings acceptance probability of a candidate.
///
/// `delta` is the log-likelihood difference plus the log prior ratio of the
/// total tree lengths. An undefined difference, as between two trees of
/// zero likelihood, never accepts.
pub fn acceptance_probability(delta: f64) -> f64 {
    if delta.is_nan() {
        return 0.0;
    }

    delta.exp().min(1.0)
}

/// Log Metropolis-Hastings ratio of a candidate against the current tree.
///
/// The log-likelihood difference is corrected by the log prior ratio of the
/// total tree lengths under `distribution`.
pub fn log_acceptance_ratio(
    current: (f64, f64),
    candidate: (f64, f64),
    distribution: &BranchLengthDistribution,
) -> f64 {
    let (current_log_likelihood, current_length) = current;
    let (candidate_log_likelihood, candidate_length) = candidate;

    (candidate_log_likelihood - current_log_likelihood)
        + distribution.log_prior_ratio(current_length, candidate_length)
}

/// Propose and accept or reject one Nearest-Neighbor Interchange.
///
/// A pivot is drawn uniformly among the eligible clades. The two rotations
/// of its permutable subtrees are tried in turn: each candidate receives
/// fresh branch lengths from `distribution` and is accepted with the
/// Metropolis-Hastings probability. The first accepted candidate becomes the
/// new state. When both are rejected the current tree is returned unchanged.
/// The returned tree never carries likelihood caches.
pub fn nni_step<R: Rng + ?Sized>(
    mut current: Tree,
    distribution: &BranchLengthDistribution,
    model: &EvolutionModel,
    rng: &mut R,
) -> Result<NniOutcome, PhyloError> {
    let nodes = eligible_nodes(&current)?;

    let node = *nodes.choose(rng).ok_or_else(|| {
        PhyloError::MalformedTopology(
            "NNI requires a tree with at least four taxa".to_string(),
        )
    })?;

    trace!(
        code = TelemetryCode::UCNNI0001.to_string(),
        pivot = node,
        "NNI pivot chosen"
    );

    let permutable = permutable_nodes(&current, node)?;

    let current_log_likelihood = match current.log_likelihood() {
        Some(log_likelihood) => log_likelihood,
        None => calculate_likelihood(&mut current, model)?.log_likelihood,
    };

    current.clear_caches();

    let current_length = current.total_length();

    for shift in 1..=2 {
        let mut rotated = permutable;
        rotated.rotate_right(shift);

        let mut candidate = generate_topology(&current, node, &rotated)?;

        candidate.generate_random_branch_lengths(
            distribution,
            BranchLengthMode::Free,
            rng,
        );

        let candidate_log_likelihood =
            calculate_likelihood(&mut candidate, model)?.log_likelihood;
        candidate.clear_caches();

        let delta = log_acceptance_ratio(
            (current_log_likelihood, current_length),
            (candidate_log_likelihood, candidate.total_length()),
            distribution,
        );

        let rho = acceptance_probability(delta);

        if rng.gen::<f64>() < rho {
            trace!(
                code = TelemetryCode::UCNNI0002.to_string(),
                delta = delta,
                log_likelihood = candidate_log_likelihood,
                "NNI candidate accepted"
            );

            return Ok(NniOutcome {
                tree: candidate,
                accepted: true,
            });
        }
    }

    trace!(
        code = TelemetryCode::UCNNI0003.to_string(),
        "NNI candidates rejected"
    );

    Ok(NniOutcome {
        tree: current,
        accepted: false,
    })
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::sequence::Sequence;
    use rand::{rngs::StdRng, SeedableRng};

    fn clamped_tree(rng: &mut StdRng) -> (Tree, EvolutionModel) {
        let model = EvolutionModel::default();
        let mut tree =
            Tree::generate_random_topology(None, Some(6), rng).unwrap();

        tree.root_with_outgroup("S0").unwrap();
        tree.generate_random_branch_lengths(
            &BranchLengthDistribution::exponential(0.1).unwrap(),
            BranchLengthMode::Free,
            rng,
        );

        let sequences = tree
            .terminal_names()
            .into_iter()
            .map(|name| {
                let body = model.codec.generate_sequence(30, None, rng);
                Sequence::new(name, body)
            })
            .collect::<Vec<_>>();

        tree.clamp_sequences(&sequences, &model.codec).unwrap();

        (tree, model)
    }

    #[test]
    fn test_acceptance_probability() {
        assert_eq!(acceptance_probability(0.0), 1.0);
        assert_eq!(acceptance_probability(3.0), 1.0);
        assert_eq!(acceptance_probability(f64::INFINITY), 1.0);
        assert_eq!(acceptance_probability(f64::NEG_INFINITY), 0.0);
        assert_eq!(acceptance_probability(f64::NAN), 0.0);
        assert!(
            (acceptance_probability(-1.0) - (-1.0_f64).exp()).abs() < 1e-15
        );
    }

    #[test]
    fn test_step_returns_a_valid_tree() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut tree, model) = clamped_tree(&mut rng);
        let distribution = BranchLengthDistribution::exponential(0.1).unwrap();

        let mut names = tree.terminal_names();
        names.sort();

        for _ in 0..25 {
            let outcome =
                nni_step(tree, &distribution, &model, &mut rng).unwrap();
            tree = outcome.tree;

            let mut current = tree.terminal_names();
            current.sort();

            assert_eq!(current, names);
            assert_eq!(tree.parents().len(), 2 * 6 - 2);
            assert!(tree.log_likelihood().is_some());
            assert_eq!(tree.seq_len(), Some(30));
        }
    }

    #[test]
    fn test_rejection_keeps_the_current_tree() {
        let mut rng = StdRng::seed_from_u64(5);
        let (tree, model) = clamped_tree(&mut rng);
        let distribution = BranchLengthDistribution::exponential(0.1).unwrap();
        let signature = tree.topology_signature();

        for _ in 0..50 {
            let outcome =
                nni_step(tree.clone(), &distribution, &model, &mut rng)
                    .unwrap();

            if !outcome.accepted {
                assert_eq!(outcome.tree.topology_signature(), signature);
                assert_eq!(
                    outcome.tree.total_length(),
                    tree.total_length()
                );
                return;
            }
        }

        panic!("no rejection in 50 steps");
    }

    #[test]
    fn test_log_ratio_carries_the_length_prior() {
        let exponential = BranchLengthDistribution::exponential(0.5).unwrap();
        let uniform = BranchLengthDistribution::uniform(0.01, 1.0).unwrap();

        let current = (-120.0, 2.0);
        let candidate = (-118.5, 3.0);

        // 1.5 from the likelihood, minus (3 - 2) / 0.5 from the prior.
        let ratio = log_acceptance_ratio(current, candidate, &exponential);
        assert!((ratio - (1.5 - 2.0)).abs() < 1e-12);

        let ratio = log_acceptance_ratio(current, candidate, &uniform);
        assert!((ratio - 1.5).abs() < 1e-12);

        // A shorter candidate is favoured under the exponential prior.
        let ratio =
            log_acceptance_ratio(current, (-120.0, 1.0), &exponential);
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_output_carries_no_caches() {
        let mut rng = StdRng::seed_from_u64(8);
        let (mut tree, model) = clamped_tree(&mut rng);
        let distribution = BranchLengthDistribution::exponential(0.1).unwrap();

        calculate_likelihood(&mut tree, &model).unwrap();
        assert!(!tree.clade(tree.root()).conditional_likelihood().is_empty());

        for _ in 0..10 {
            tree = nni_step(tree, &distribution, &model, &mut rng)
                .unwrap()
                .tree;

            assert!(tree.log_likelihood().is_some());
            assert!(tree
                .clades()
                .iter()
                .all(|clade| clade.conditional_likelihood().is_empty()));
        }
    }

    #[test]
    fn test_three_taxa_cannot_move() {
        let mut rng = StdRng::seed_from_u64(1);
        let tree = Tree::from_newick("((A:1,B:1):1,C:1);").unwrap();

        assert!(nni_step(
            tree,
            &BranchLengthDistribution::exponential(0.1).unwrap(),
            &EvolutionModel::default(),
            &mut rng,
        )
        .is_err());
    }
}

use crate::{
    domain::dtos::{
        branch_length::BranchLengthDistribution,
        chain_config::ChainConfig,
        errors::PhyloError,
        likelihood::EvolutionModel,
        telemetry_code::TelemetryCode,
        tree::Tree,
        walker::{ChainState, WalkerSummary},
    },
    use_cases::{calculate_likelihood, nni_step},
};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

/// Random generator of one walker.
pub(super) fn walker_rng(seed: Option<u64>, walker: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(walker as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Run a single chain to completion.
pub(super) fn run_walker(
    walker: usize,
    mut tree: Tree,
    config: &ChainConfig,
    distribution: &BranchLengthDistribution,
    model: &EvolutionModel,
) -> Result<WalkerSummary, PhyloError> {
    let mut rng = walker_rng(config.seed, walker);

    let log_likelihood = match tree.log_likelihood() {
        Some(log_likelihood) => log_likelihood,
        None => calculate_likelihood(&mut tree, model)?.log_likelihood,
    };

    tree.clear_caches();

    debug!(
        code = TelemetryCode::UCMCMC0003.to_string(),
        log_likelihood = log_likelihood,
        "Walker started"
    );

    let mut state = ChainState {
        tree,
        log_likelihood,
        accepted: 0,
    };

    let mut log_likelihood_trace = Vec::with_capacity(config.nsteps);
    let mut samples = Vec::with_capacity(config.expected_samples());

    for step in 1..=config.nsteps {
        let outcome = nni_step(state.tree, distribution, model, &mut rng)?;

        if outcome.accepted {
            state.accepted += 1;
        }

        state.tree = outcome.tree;

        if let Some(log_likelihood) = state.tree.log_likelihood() {
            state.log_likelihood = log_likelihood;
        }

        log_likelihood_trace.push(state.log_likelihood);

        if config.is_saved_step(step) {
            samples.push(state.tree.to_sample());

            trace!(
                code = TelemetryCode::UCMCMC0005.to_string(),
                step = step,
                log_likelihood = state.log_likelihood,
                "Sample saved"
            );
        }
    }

    let acceptance_ratio = state.accepted as f64 / config.nsteps as f64;

    debug!(
        code = TelemetryCode::UCMCMC0004.to_string(),
        accepted = state.accepted,
        acceptance_ratio = acceptance_ratio,
        log_likelihood = state.log_likelihood,
        "Walker finished"
    );

    Ok(WalkerSummary {
        walker,
        nsteps: config.nsteps,
        accepted: state.accepted,
        acceptance_ratio,
        log_likelihood_trace,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_walker_seeds_are_offset() {
        let a = walker_rng(Some(10), 1).gen::<u64>();
        let b = walker_rng(Some(11), 0).gen::<u64>();
        let c = walker_rng(Some(10), 0).gen::<u64>();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

mod run_walker;

use run_walker::*;

use crate::domain::dtos::{
    branch_length::BranchLengthDistribution, chain_config::ChainConfig,
    likelihood::EvolutionModel, telemetry_code::TelemetryCode, tree::Tree,
    walker::WalkerSummary,
};

use mycelium_base::utils::errors::{use_case_err, MappedErrors};
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, ParallelIterator,
};
use tracing::{debug, info_span, Span};
use uuid::Uuid;

/// Run one Markov chain per starting tree.
///
/// Walkers run in parallel and never share state. Each one performs
/// `config.nsteps` NNI steps with its own random generator, seeded with
/// `config.seed + walker` when a seed is configured. Summaries are returned
/// in walker order.
#[tracing::instrument(
    name = "RunningMcmc",
    skip_all,
    fields(
        run_id = Uuid::new_v4().to_string().replace("-", "")
    )
)]
pub fn run_mcmc(
    walkers: Vec<Tree>,
    config: &ChainConfig,
    distribution: &BranchLengthDistribution,
    model: &EvolutionModel,
) -> Result<Vec<WalkerSummary>, MappedErrors> {
    // ? -----------------------------------------------------------------------
    // ? Validate the run
    // ? -----------------------------------------------------------------------

    if let Err(err) = config.validate() {
        return use_case_err(format!("Invalid chain configuration: {err}"))
            .as_error();
    }

    if walkers.len() != config.nwalkers {
        return use_case_err(format!(
            "Expected {} starting trees, found {}",
            config.nwalkers,
            walkers.len()
        ))
        .as_error();
    }

    if let Some(tree) = walkers.iter().find(|tree| tree.n_taxa() < 4) {
        return use_case_err(format!(
            "NNI requires at least 4 taxa, tree {} has {}",
            tree.name,
            tree.n_taxa()
        ))
        .as_error();
    }

    debug!(
        code = TelemetryCode::UCMCMC0001.to_string(),
        nwalkers = config.nwalkers,
        nsteps = config.nsteps,
        burn_in = config.burn_in,
        save_frequency = config.save_frequency,
        distribution = distribution.to_string(),
        "Start MCMC run"
    );

    // ? -----------------------------------------------------------------------
    // ? Run the walkers
    // ? -----------------------------------------------------------------------

    let run_span = Span::current();

    let summaries = walkers
        .into_par_iter()
        .enumerate()
        .map(|(walker, tree)| {
            let span = info_span!(parent: &run_span, "Walker", walker = walker);
            let _span_guard = span.enter();

            run_walker(walker, tree, config, distribution, model)
        })
        .collect::<Result<Vec<WalkerSummary>, _>>();

    let summaries = match summaries {
        Ok(summaries) => summaries,
        Err(err) => {
            return use_case_err(format!("Walker failed: {err}")).as_error()
        }
    };

    debug!(
        code = TelemetryCode::UCMCMC0002.to_string(),
        samples = summaries.iter().map(|s| s.samples.len()).sum::<usize>(),
        "MCMC run finished"
    );

    Ok(summaries)
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

/// This module contains the Felsenstein pruning likelihood of a tree.
mod calculate_likelihood;

/// This module contains the construction of the initial walker trees.
mod initialize_random_tree;

/// This module contains the Nearest-Neighbor Interchange proposal engine.
mod nni;

/// This module contains the multi-walker MCMC driver.
mod run_mcmc;

/// This module contains the synthetic data generator used for evaluation.
mod simulate_artificial_data;

/// This module contains the posterior topology frequency summary.
mod summarize_samples;

/// This module contains the batch writer of saved samples.
mod write_samples;

/// Elements of shared module are restricted to be used only in this crate.
mod shared;

pub use calculate_likelihood::*;
pub use initialize_random_tree::*;
pub use nni::*;
pub use run_mcmc::*;
pub use simulate_artificial_data::*;
pub use summarize_samples::*;
pub use write_samples::*;

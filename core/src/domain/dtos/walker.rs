use super::tree::Tree;

use serde::{Deserialize, Serialize};

/// Tree returned by one NNI step.
#[derive(Clone, Debug)]
pub struct NniOutcome {
    /// The new chain state: an accepted candidate, or the unchanged current
    /// tree on rejection.
    pub tree: Tree,

    pub accepted: bool,
}

/// State of one chain during a run.
#[derive(Clone, Debug)]
pub struct ChainState {
    pub tree: Tree,
    pub log_likelihood: f64,
    pub accepted: usize,
}

/// What remains of a walker once its run is complete.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkerSummary {
    pub walker: usize,

    pub nsteps: usize,

    pub accepted: usize,

    /// Accepted steps over performed steps.
    pub acceptance_ratio: f64,

    /// Log-likelihood of the chain state after every step.
    pub log_likelihood_trace: Vec<f64>,

    /// Trees saved after the burn-in, in step order.
    pub samples: Vec<Tree>,
}

impl WalkerSummary {
    pub fn final_log_likelihood(&self) -> Option<f64> {
        self.log_likelihood_trace.last().copied()
    }
}

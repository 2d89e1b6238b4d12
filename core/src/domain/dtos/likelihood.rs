use super::{
    alphabet::{Alphabet, StateVector},
    sequence::SequenceCodec,
    substitution_model::JukesCantor,
};

use serde::{Deserialize, Serialize};

/// Result of one likelihood evaluation.
///
/// The raw probability underflows to zero for realistic sequence lengths, so
/// any comparison between trees should use `log_likelihood`, which is the sum
/// of the per-site logs. A site with zero probability yields negative
/// infinity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Likelihood {
    pub likelihood: f64,
    pub log_likelihood: f64,
}

/// Everything the likelihood engine needs besides the tree: the codec used
/// to read terminal sequences, the substitution model and the prior over the
/// root states.
#[derive(Clone, Debug)]
pub struct EvolutionModel {
    pub codec: SequenceCodec,
    pub substitution: JukesCantor,
    pub root_prior: StateVector,
}

impl Default for EvolutionModel {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}

impl EvolutionModel {
    /// Model over `alphabet` with a uniform root prior.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            root_prior: alphabet.uniform(),
            codec: SequenceCodec::new(alphabet.clone()),
            substitution: JukesCantor::new(alphabet),
        }
    }

    pub fn with_root_prior(mut self, root_prior: StateVector) -> Self {
        self.root_prior = root_prior;
        self
    }
}

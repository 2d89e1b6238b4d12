use serde::{Deserialize, Serialize};

/// Number of states of the nucleotide alphabet.
pub const N_BASES: usize = 4;

/// A per-site probability distribution over the alphabet states.
pub type StateVector = [f64; N_BASES];

/// The nucleotide alphabet shared by the sequence codec and the substitution
/// model.
///
/// The alphabet is an immutable value built once and handed to the consumers
/// at construction. The position of a symbol in `bases` is its rank, used as
/// the index of the state in every probability vector and transition matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alphabet {
    bases: [char; N_BASES],
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::nucleotides()
    }
}

impl Alphabet {
    /// The canonical `ACGT` alphabet.
    pub fn nucleotides() -> Self {
        Self {
            bases: ['A', 'C', 'G', 'T'],
        }
    }

    pub fn bases(&self) -> &[char; N_BASES] {
        &self.bases
    }

    pub fn n_bases(&self) -> usize {
        N_BASES
    }

    /// Rank of a symbol, case insensitive.
    pub fn rank(&self, symbol: char) -> Option<usize> {
        let symbol = symbol.to_ascii_uppercase();
        self.bases.iter().position(|base| *base == symbol)
    }

    /// Symbol of a rank.
    pub fn symbol(&self, rank: usize) -> Option<char> {
        self.bases.get(rank).copied()
    }

    /// Uniform distribution over the states, used as the default root prior.
    pub fn uniform(&self) -> StateVector {
        [1.0 / N_BASES as f64; N_BASES]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_case_insensitive() {
        let alphabet = Alphabet::nucleotides();

        assert_eq!(alphabet.rank('A'), Some(0));
        assert_eq!(alphabet.rank('g'), Some(2));
        assert_eq!(alphabet.rank('N'), None);
        assert_eq!(alphabet.symbol(3), Some('T'));
        assert_eq!(alphabet.symbol(4), None);
    }

    #[test]
    fn test_uniform_sums_to_one() {
        let total: f64 = Alphabet::default().uniform().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}

use super::{
    alphabet::{Alphabet, StateVector, N_BASES},
    errors::PhyloError,
    substitution_model::JukesCantor,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SequenceHeader(String);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SequenceBody(String);

impl SequenceHeader {
    pub fn new<T>(header: T) -> Self
    where
        T: Into<String>,
    {
        SequenceHeader(header.into())
    }

    pub fn header(&self) -> &str {
        &self.0
    }
}

impl SequenceBody {
    pub fn new<T>(body: T) -> Self
    where
        T: Into<String>,
    {
        SequenceBody(body.into())
    }

    pub fn seq(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named observed sequence, as read from a FASTA record.
#[derive(Debug, Clone)]
pub struct Sequence {
    header: SequenceHeader,
    sequence: SequenceBody,
}

impl Sequence {
    pub fn new<T>(header: T, sequence: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            header: SequenceHeader::new(header),
            sequence: SequenceBody::new(sequence),
        }
    }

    pub fn header(&self) -> &SequenceHeader {
        &self.header
    }

    pub fn header_content(&self) -> &str {
        self.header.header()
    }

    pub fn sequence(&self) -> &SequenceBody {
        &self.sequence
    }

    pub fn sequence_content(&self) -> &str {
        self.sequence.seq()
    }

    pub fn to_fasta(&self) -> String {
        format!(">{}\n{}\n", self.header.header(), self.sequence.seq())
    }
}

/// Conversions between symbolic sequences and the numeric representations
/// consumed by the likelihood engine.
#[derive(Clone, Debug, Default)]
pub struct SequenceCodec {
    alphabet: Alphabet,
}

impl SequenceCodec {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Map each symbol to its alphabet rank.
    pub fn sequence_to_index(
        &self,
        sequence: &str,
    ) -> Result<Vec<usize>, PhyloError> {
        sequence
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.alphabet
                    .rank(symbol)
                    .ok_or(PhyloError::InvalidSymbol { symbol, position })
            })
            .collect()
    }

    /// Map each rank back to its symbol.
    pub fn index_to_sequence(
        &self,
        index: &[usize],
    ) -> Result<String, PhyloError> {
        index
            .iter()
            .enumerate()
            .map(|(position, rank)| {
                self.alphabet.symbol(*rank).ok_or(PhyloError::InvalidRank {
                    rank: *rank,
                    position,
                })
            })
            .collect()
    }

    /// Probability vector with all the mass on `rank`.
    pub fn one_hot(&self, rank: usize) -> StateVector {
        let mut vector = [0.0; N_BASES];
        vector[rank] = 1.0;
        vector
    }

    /// One-hot encoding of every site of a sequence.
    pub fn encode(
        &self,
        sequence: &str,
    ) -> Result<Vec<StateVector>, PhyloError> {
        Ok(self
            .sequence_to_index(sequence)?
            .into_iter()
            .map(|rank| self.one_hot(rank))
            .collect())
    }

    /// Draw `seq_len` independent symbols.
    ///
    /// Symbols are drawn uniformly when `prob` is `None`, otherwise from the
    /// given distribution over the alphabet ranks.
    pub fn generate_sequence<R: Rng + ?Sized>(
        &self,
        seq_len: usize,
        prob: Option<&StateVector>,
        rng: &mut R,
    ) -> String {
        (0..seq_len)
            .map(|_| {
                let rank = match prob {
                    None => rng.gen_range(0..N_BASES),
                    Some(prob) => sample_state(prob, rng),
                };

                self.alphabet.bases()[rank]
            })
            .collect()
    }

    /// Evolve a child sequence from its parent along an edge.
    ///
    /// Every site is an independent Markov step: the child base is drawn from
    /// the row of the transition matrix indexed by the parent base.
    pub fn generate_child_from_parent<R: Rng + ?Sized>(
        &self,
        parent: &str,
        edge_length: f64,
        model: &JukesCantor,
        rng: &mut R,
    ) -> Result<String, PhyloError> {
        let matrix = model.markov_matrix(edge_length);

        let child = self
            .sequence_to_index(parent)?
            .into_iter()
            .map(|rank| {
                let child_prob =
                    model.markov_process(&self.one_hot(rank), &matrix);
                self.alphabet.bases()[sample_state(&child_prob, rng)]
            })
            .collect();

        Ok(child)
    }

    /// Number of sites where both sequences differ.
    pub fn count_mutations(&self, parent: &str, child: &str) -> usize {
        parent
            .chars()
            .zip(child.chars())
            .filter(|(parent, child)| parent != child)
            .count()
    }
}

/// Draw one state index from a probability vector.
fn sample_state<R: Rng + ?Sized>(prob: &StateVector, rng: &mut R) -> usize {
    let total: f64 = prob.iter().sum();
    let target = rng.gen::<f64>() * total;

    let mut cumulative = 0.0;
    let mut last_possible = 0;

    for (rank, p) in prob.iter().enumerate() {
        if *p <= 0.0 {
            continue;
        }

        cumulative += p;
        last_possible = rank;

        if target < cumulative {
            return rank;
        }
    }

    last_possible
}

use thiserror::Error;

/// Errors raised by the phylogenetic domain.
///
/// All variants are contract violations of the caller or the input data. None
/// of them is retried: the offending operation stops and the error is
/// propagated to the use case that started it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhyloError {
    #[error("invalid symbol `{symbol}` at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("invalid alphabet rank {rank} at position {position}")]
    InvalidRank { rank: usize, position: usize },

    #[error("taxon not found: {0}")]
    TaxonNotFound(String),

    #[error("unsupported branch length distribution: {0}")]
    UnsupportedDistribution(String),

    #[error("malformed topology: {0}")]
    MalformedTopology(String),
}

use super::alphabet::{Alphabet, StateVector, N_BASES};

/// Row-stochastic transition probabilities over one edge.
///
/// `matrix[i][j]` is the probability of observing state `j` at the end of the
/// edge given state `i` at its start.
pub type TransitionMatrix = [[f64; N_BASES]; N_BASES];

/// Jukes-Cantor substitution model.
///
/// Equal base frequencies and equal exchange rates between every pair of
/// states. The transition matrix has a closed form:
///
/// ```text
/// a      = 3/4 * (1 - exp(-4t/3))
/// M[i,j] = a/3        (i != j)
/// M[i,i] = 1 - a
/// ```
///
/// Branch lengths must be non-negative. Negative values are outside the
/// domain of the model and are rejected by the callers that produce them.
#[derive(Clone, Debug, Default)]
pub struct JukesCantor {
    alphabet: Alphabet,
}

impl JukesCantor {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Transition probability matrix for an edge of length `edge_length`.
    pub fn markov_matrix(&self, edge_length: f64) -> TransitionMatrix {
        debug_assert!(edge_length >= 0.0, "negative edge length");

        let a = 3.0 / 4.0 * (1.0 - (-4.0 / 3.0 * edge_length).exp());
        let off_diagonal = a / 3.0;
        let diagonal = 1.0 - a;

        let mut matrix = [[off_diagonal; N_BASES]; N_BASES];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = diagonal;
        }

        matrix
    }

    /// Evolve a state distribution forward along an edge (`p @ M`).
    pub fn markov_process(
        &self,
        p_init: &StateVector,
        matrix: &TransitionMatrix,
    ) -> StateVector {
        let mut p_final = [0.0; N_BASES];

        for (i, p) in p_init.iter().enumerate() {
            for (j, value) in p_final.iter_mut().enumerate() {
                *value += p * matrix[i][j];
            }
        }

        p_final
    }

    /// Propagate a conditional likelihood vector up through an edge
    /// (`M @ v`).
    pub fn propagate(
        &self,
        matrix: &TransitionMatrix,
        conditional: &StateVector,
    ) -> StateVector {
        let mut weighted = [0.0; N_BASES];

        for (i, value) in weighted.iter_mut().enumerate() {
            *value = matrix[i]
                .iter()
                .zip(conditional.iter())
                .map(|(m, c)| m * c)
                .sum();
        }

        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_sum_to_one() {
        let model = JukesCantor::default();

        for edge_length in [0.0, 1e-6, 0.01, 0.1, 0.5, 1.0, 2.5, 10.0, 1e3] {
            let matrix = model.markov_matrix(edge_length);

            for row in matrix.iter() {
                let total: f64 = row.iter().sum();
                assert!(
                    (total - 1.0).abs() < 1e-9,
                    "row sums to {total} for t = {edge_length}"
                );
            }
        }
    }

    #[test]
    fn test_zero_length_is_identity() {
        let matrix = JukesCantor::default().markov_matrix(0.0);

        for i in 0..N_BASES {
            for j in 0..N_BASES {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((matrix[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_long_edge_converges_to_uniform() {
        let matrix = JukesCantor::default().markov_matrix(1e4);

        for row in matrix.iter() {
            for value in row.iter() {
                assert!((value - 0.25).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_markov_process_keeps_mass() {
        let model = JukesCantor::default();
        let matrix = model.markov_matrix(0.3);
        let p = model.markov_process(&[0.0, 1.0, 0.0, 0.0], &matrix);

        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(p, matrix[1]);
    }

    #[test]
    fn test_propagate_leaf_vector_selects_column() {
        let model = JukesCantor::default();
        let matrix = model.markov_matrix(0.2);
        let weighted = model.propagate(&matrix, &[0.0, 0.0, 1.0, 0.0]);

        for i in 0..N_BASES {
            assert!((weighted[i] - matrix[i][2]).abs() < 1e-15);
        }
    }
}

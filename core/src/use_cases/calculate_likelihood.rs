use crate::domain::dtos::{
    alphabet::{StateVector, N_BASES},
    errors::PhyloError,
    likelihood::{EvolutionModel, Likelihood},
    traversal::RootedTopology,
    tree::Tree,
};

/// Likelihood of the clamped terminal sequences given the tree.
///
/// Implements Felsenstein pruning: nonterminals are visited in postorder and
/// every child contributes its conditional vectors propagated through the
/// transition matrix of its edge. Terminal conditionals are the one-hot
/// encoding of their sequence. The per-clade caches are overwritten on every
/// call and the log-likelihood is stored in the tree.
pub fn calculate_likelihood(
    tree: &mut Tree,
    model: &EvolutionModel,
) -> Result<Likelihood, PhyloError> {
    let seq_len = tree.seq_len().ok_or_else(|| {
        PhyloError::MalformedTopology(
            "no sequence is clamped to the tree terminals".to_string(),
        )
    })?;

    for parent in tree.nonterminals_postorder() {
        let (left, right) = match tree.clade(parent).children.as_slice() {
            [left, right] => (*left, *right),
            other => {
                return Err(PhyloError::MalformedTopology(format!(
                    "clade {parent} has {} children, expected 2",
                    other.len()
                )))
            }
        };

        for child in [left, right] {
            if tree.is_terminal(child) {
                let conditional = encode_terminal(tree, child, model)?;

                if conditional.len() != seq_len {
                    return Err(PhyloError::MalformedTopology(format!(
                        "terminal {child} has a sequence length other \
                        than {seq_len}"
                    )));
                }

                tree.clade_mut(child).conditional = conditional;
            }

            let clade = tree.clade(child);
            let matrix =
                model.substitution.markov_matrix(clade.branch_length());

            let weighted = clade
                .conditional
                .iter()
                .map(|site| model.substitution.propagate(&matrix, site))
                .collect::<Vec<StateVector>>();

            tree.clade_mut(child).weighted = weighted;
        }

        let conditional = tree
            .clade(left)
            .weighted
            .iter()
            .zip(tree.clade(right).weighted.iter())
            .map(|(l, r)| {
                std::array::from_fn::<f64, N_BASES, _>(|state| {
                    l[state] * r[state]
                })
            })
            .collect::<Vec<StateVector>>();

        tree.clade_mut(parent).conditional = conditional;
    }

    // ? -----------------------------------------------------------------------
    // ? Combine the root conditionals with the root prior
    // ? -----------------------------------------------------------------------

    let mut likelihood = 1.0;
    let mut log_likelihood = 0.0;

    for site in tree.clade(tree.root()).conditional.iter() {
        let joint = model
            .root_prior
            .iter()
            .zip(site.iter())
            .map(|(prior, conditional)| prior * conditional)
            .sum::<f64>();

        likelihood *= joint;
        log_likelihood += if joint > 0.0 {
            joint.ln()
        } else {
            f64::NEG_INFINITY
        };
    }

    tree.set_log_likelihood(log_likelihood);

    Ok(Likelihood {
        likelihood,
        log_likelihood,
    })
}

fn encode_terminal(
    tree: &Tree,
    id: usize,
    model: &EvolutionModel,
) -> Result<Vec<StateVector>, PhyloError> {
    let clade = tree.clade(id);

    let sequence = clade.sequence.as_ref().ok_or_else(|| {
        PhyloError::MalformedTopology(format!(
            "terminal {} has no sequence",
            clade.name.as_deref().unwrap_or("unnamed")
        ))
    })?;

    model.codec.encode(sequence.seq())
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::{sequence::Sequence, tree::tests::balanced_four};

    fn clamp(tree: &mut Tree, sequences: [&str; 4]) {
        let model = EvolutionModel::default();
        let sequences = ["A", "B", "C", "D"]
            .iter()
            .zip(sequences.iter())
            .map(|(name, seq)| Sequence::new(*name, *seq))
            .collect::<Vec<_>>();

        tree.clamp_sequences(&sequences, &model.codec).unwrap();
    }

    fn set_all_lengths(tree: &mut Tree, length: f64) {
        let root = tree.root();

        for id in 0..tree.clades().len() {
            if id != root {
                tree.clade_mut(id).length = Some(length);
            }
        }
    }

    #[test]
    fn test_identical_sequences_on_zero_length_edges() {
        let mut tree = balanced_four();
        set_all_lengths(&mut tree, 0.0);
        clamp(&mut tree, ["ACGT", "ACGT", "ACGT", "ACGT"]);

        let model = EvolutionModel::default();
        let result = calculate_likelihood(&mut tree, &model).unwrap();

        // Conditioned on the root state every site is certain.
        let root = tree.clade(tree.root());
        for (site, base) in root.conditional_likelihood().iter().zip(0..4) {
            assert!((site[base] - 1.0).abs() < 1e-12);
            assert!(site.iter().sum::<f64>() - 1.0 < 1e-12);
        }

        // Only the uniform root prior remains.
        assert!((result.likelihood - 0.25_f64.powi(4)).abs() < 1e-12);
        assert!((result.log_likelihood - 4.0 * 0.25_f64.ln()).abs() < 1e-9);
        assert_eq!(tree.log_likelihood(), Some(result.log_likelihood));
    }

    #[test]
    fn test_mismatch_on_zero_length_edges_is_impossible() {
        let mut tree = balanced_four();
        set_all_lengths(&mut tree, 0.0);
        clamp(&mut tree, ["AAAA", "AAAA", "AAAA", "AAAC"]);

        let result =
            calculate_likelihood(&mut tree, &EvolutionModel::default())
                .unwrap();

        assert_eq!(result.likelihood, 0.0);
        assert_eq!(result.log_likelihood, f64::NEG_INFINITY);
    }

    #[test]
    fn test_saturated_edges_make_terminals_independent() {
        let mut tree = balanced_four();
        set_all_lengths(&mut tree, 1e6);
        clamp(&mut tree, ["ACGT", "CCGA", "TTTT", "GACA"]);

        let result =
            calculate_likelihood(&mut tree, &EvolutionModel::default())
                .unwrap();

        // Four independent uniform symbols at each of the four sites.
        let expected = 0.25_f64.powi(16);
        assert!((result.likelihood - expected).abs() / expected < 1e-9);
        assert!((result.log_likelihood - 16.0 * 0.25_f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_closer_sequences_are_more_likely() {
        let model = EvolutionModel::default();

        let mut similar = balanced_four();
        clamp(&mut similar, ["ACGTAC", "ACGTAC", "ACGTAA", "ACGTAA"]);

        let mut distant = balanced_four();
        clamp(&mut distant, ["ACGTAC", "TGCATG", "CATGCA", "GTACGT"]);

        let similar = calculate_likelihood(&mut similar, &model).unwrap();
        let distant = calculate_likelihood(&mut distant, &model).unwrap();

        assert!(similar.log_likelihood > distant.log_likelihood);
    }

    #[test]
    fn test_missing_sequences_fail() {
        let mut tree = balanced_four();

        assert!(matches!(
            calculate_likelihood(&mut tree, &EvolutionModel::default()),
            Err(PhyloError::MalformedTopology(_))
        ));
    }
}

use super::Tree;
use crate::domain::dtos::{clade::Clade, errors::PhyloError, traversal::NodeId};

use rand::{seq::SliceRandom, Rng};
use tracing::warn;

impl Tree {
    /// Build a random rooted binary topology.
    ///
    /// Taxon names are taken from `taxa_names` when given (`n_taxa` is then
    /// ignored), or synthesized as `S0`, `S1`, ... for `n_taxa` taxa. When
    /// neither is given the number of taxa is drawn uniformly from
    /// `[3, 100)`. At least three taxa are required.
    ///
    /// The tree grows from a single root by repeatedly splitting a uniformly
    /// chosen terminal into two new terminals. Names are shuffled over the
    /// final terminals. Branch lengths are left unset.
    pub fn generate_random_topology<R: Rng + ?Sized>(
        taxa_names: Option<Vec<String>>,
        n_taxa: Option<usize>,
        rng: &mut R,
    ) -> Result<Tree, PhyloError> {
        let mut taxa_names = match taxa_names {
            None => {
                let n_taxa = n_taxa.unwrap_or_else(|| rng.gen_range(3..100));
                (0..n_taxa).map(|i| format!("S{i}")).collect::<Vec<_>>()
            }
            Some(names) => {
                if let Some(n_taxa) = n_taxa {
                    warn!(n_taxa, "Ignoring n_taxa since taxa names are given");
                }

                names
            }
        };

        if taxa_names.len() < 3 {
            return Err(PhyloError::MalformedTopology(format!(
                "at least 3 taxa are required, found {}",
                taxa_names.len()
            )));
        }

        let mut clades = vec![Clade::new_root(0, Vec::new())];
        let mut terminals: Vec<NodeId> = vec![0];

        while terminals.len() < taxa_names.len() {
            let split = terminals.remove(rng.gen_range(0..terminals.len()));

            let left = clades.len();
            let right = left + 1;

            clades.push(Clade::new_leaf(left, String::new(), None));
            clades.push(Clade::new_leaf(right, String::new(), None));

            clades[split].children = vec![left, right];
            if split != 0 {
                clades[split].name = None;
            }

            terminals.extend([left, right]);
        }

        taxa_names.shuffle(rng);

        for (id, name) in terminals.into_iter().zip(taxa_names) {
            clades[id].name = Some(name);
        }

        Tree::from_arena("random".to_string(), clades, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::traversal::RootedTopology;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_topology_from_names() {
        let mut rng = StdRng::seed_from_u64(1);
        let names: Vec<String> =
            ["A", "B", "C", "D", "E"].iter().map(|n| n.to_string()).collect();

        let tree = Tree::generate_random_topology(
            Some(names.clone()),
            Some(9),
            &mut rng,
        )
        .unwrap();

        let mut found = tree.terminal_names();
        found.sort();

        assert_eq!(found, names);
        assert_eq!(tree.n_taxa(), 5);
        assert_eq!(tree.clades().len(), 9);
        assert_eq!(tree.nonterminals_postorder().len(), 4);
    }

    #[test]
    fn test_topology_from_count() {
        let mut rng = StdRng::seed_from_u64(2);
        let tree =
            Tree::generate_random_topology(None, Some(12), &mut rng).unwrap();

        assert_eq!(tree.n_taxa(), 12);
        assert!(tree.terminal_by_name("S0").is_ok());
        assert!(tree.terminal_by_name("S11").is_ok());
    }

    #[test]
    fn test_topology_with_random_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let tree =
            Tree::generate_random_topology(None, None, &mut rng).unwrap();

        assert!((3..100).contains(&tree.n_taxa()));
    }

    #[test]
    fn test_too_few_taxa() {
        let mut rng = StdRng::seed_from_u64(4);
        let names = vec!["A".to_string(), "B".to_string()];

        assert!(matches!(
            Tree::generate_random_topology(Some(names), None, &mut rng),
            Err(PhyloError::MalformedTopology(_))
        ));
    }

    #[test]
    fn test_duplicated_names() {
        let mut rng = StdRng::seed_from_u64(5);
        let names: Vec<String> =
            ["A", "B", "A"].iter().map(|n| n.to_string()).collect();

        assert!(
            Tree::generate_random_topology(Some(names), None, &mut rng)
                .is_err()
        );
    }

    #[test]
    fn test_same_seed_same_topology() {
        let first = Tree::generate_random_topology(
            None,
            Some(20),
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();

        let second = Tree::generate_random_topology(
            None,
            Some(20),
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();

        assert_eq!(first.topology_signature(), second.topology_signature());
    }
}

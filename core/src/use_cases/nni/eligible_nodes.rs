use crate::domain::dtos::{
    errors::PhyloError,
    traversal::{NodeId, RootedTopology},
    tree::Tree,
};

/// Internal clades that can pivot a Nearest-Neighbor Interchange.
///
/// Every non-root internal clade qualifies, except that the two children of
/// the root describe a single edge: the first one met in postorder is left
/// out. A rooted binary tree with `n` taxa therefore offers `n - 3` pivots.
pub fn eligible_nodes(tree: &Tree) -> Result<Vec<NodeId>, PhyloError> {
    let root = tree.root();
    let mut root_children_seen = 0;
    let mut nodes = Vec::new();

    for id in tree.nonterminals_postorder() {
        if id == root {
            continue;
        }

        if tree.get_parent(id) == Some(root) {
            root_children_seen += 1;

            if root_children_seen == 1 {
                continue;
            }
        }

        nodes.push(id);
    }

    if nodes.len() + 3 != tree.n_taxa() {
        return Err(PhyloError::MalformedTopology(format!(
            "found {} NNI pivots on a tree of {} taxa",
            nodes.len(),
            tree.n_taxa()
        )));
    }

    Ok(nodes)
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::tree::tests::balanced_four;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_balanced_tree_has_one_pivot() {
        let tree = balanced_four();
        let nodes = eligible_nodes(&tree).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(tree.get_parent(nodes[0]), Some(tree.root()));
    }

    #[test]
    fn test_pivot_count_on_random_trees() {
        let mut rng = StdRng::seed_from_u64(7);

        for n in [3, 4, 5, 10, 50] {
            let mut tree =
                Tree::generate_random_topology(None, Some(n), &mut rng)
                    .unwrap();

            assert_eq!(eligible_nodes(&tree).unwrap().len(), n - 3);

            tree.root_with_outgroup("S0").unwrap();

            let nodes = eligible_nodes(&tree).unwrap();
            assert_eq!(nodes.len(), n - 3);
            assert!(nodes.iter().all(|id| !tree.is_terminal(*id)));
            assert!(!nodes.contains(&tree.root()));
        }
    }
}

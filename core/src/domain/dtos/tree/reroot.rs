use super::Tree;
use crate::domain::dtos::{errors::PhyloError, traversal::NodeId};

impl Tree {
    /// Re-root the tree on the edge above the terminal named `name`.
    ///
    /// The outgroup becomes the first child of the root and the rest of the
    /// tree hangs from the second one. The old root is suppressed by joining
    /// its two children into a single edge, and its arena slot is reused for
    /// the new root, so the number of clades does not change. The outgroup
    /// keeps its branch length and the ingroup edge gets a length of zero.
    pub fn root_with_outgroup(&mut self, name: &str) -> Result<(), PhyloError> {
        let outgroup = self.terminal_by_name(name)?;
        let root = self.root;

        let parent = self.get_parent(outgroup).ok_or_else(|| {
            PhyloError::MalformedTopology(format!(
                "terminal {name} has no parent"
            ))
        })?;

        if parent == root {
            let sibling = self.get_sibling(outgroup).ok_or_else(|| {
                PhyloError::MalformedTopology(format!(
                    "terminal {name} has no sibling"
                ))
            })?;

            self.set_children(root, vec![outgroup, sibling]);
            return self.refresh_index();
        }

        // ? -------------------------------------------------------------------
        // ? Unroot: undirected adjacency without the old root
        // ? -------------------------------------------------------------------

        let n_clades = self.clades.len();
        let mut adjacency: Vec<Vec<(NodeId, f64)>> = vec![Vec::new(); n_clades];

        for (child, parent) in self.parents.iter() {
            if *parent == root {
                continue;
            }

            let length = self.clades[*child].branch_length();
            adjacency[*child].push((*parent, length));
            adjacency[*parent].push((*child, length));
        }

        let (left, right) = match self.clades[root].children.as_slice() {
            [left, right] => (*left, *right),
            _ => {
                return Err(PhyloError::MalformedTopology(
                    "the root should have exactly two children".to_string(),
                ))
            }
        };

        let joined = self.clades[left].branch_length()
            + self.clades[right].branch_length();
        adjacency[left].push((right, joined));
        adjacency[right].push((left, joined));

        // ? -------------------------------------------------------------------
        // ? Re-root on the outgroup edge and orient edges away from the root
        // ? -------------------------------------------------------------------

        let (anchor, outgroup_length) = match adjacency[outgroup].as_slice() {
            [edge] => *edge,
            _ => {
                return Err(PhyloError::MalformedTopology(format!(
                    "terminal {name} should have a single neighbor"
                )))
            }
        };

        adjacency[outgroup].clear();
        adjacency[anchor].retain(|(id, _)| *id != outgroup);

        self.set_children(root, vec![outgroup, anchor]);
        self.clades[root].length = None;
        self.clades[outgroup].length = Some(outgroup_length);
        self.clades[anchor].length = Some(0.0);

        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(anchor, None)];

        while let Some((id, from)) = stack.pop() {
            let edges: Vec<(NodeId, f64)> = adjacency[id]
                .iter()
                .filter(|(neighbor, _)| Some(*neighbor) != from)
                .copied()
                .collect();

            self.clades[id].children =
                edges.iter().map(|(child, _)| *child).collect();

            for (child, length) in edges {
                self.clades[child].length = Some(length);
                stack.push((child, Some(id)));
            }
        }

        self.refresh_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::traversal::RootedTopology;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_outgroup_becomes_root_child() {
        let mut tree = Tree::from_newick("(((A:1,B:2):3,C:4):5,D:6);").unwrap();
        let length_before = tree.calculate_total_tree_length();

        tree.root_with_outgroup("A").unwrap();

        let a = tree.terminal_by_name("A").unwrap();
        assert_eq!(tree.get_parent(a), Some(tree.root()));
        assert_eq!(tree.clade(tree.root()).children[0], a);
        assert_eq!(tree.n_taxa(), 4);
        assert_eq!(tree.parents().len(), 6);
        assert_eq!(tree.topology_signature(), "(((C,D),B),A);");

        // The outgroup keeps its own edge, the ingroup edge is new.
        assert!((tree.clade(a).branch_length() - 1.0).abs() < 1e-12);
        assert!(
            (tree.calculate_total_tree_length() - length_before).abs() < 1e-12
        );
    }

    #[test]
    fn test_outgroup_already_root_child() {
        let mut tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();

        tree.root_with_outgroup("C").unwrap();

        let c = tree.terminal_by_name("C").unwrap();
        assert_eq!(tree.clade(tree.root()).children[0], c);
        assert_eq!(tree.topology_signature(), "((A,B),C);");
    }

    #[test]
    fn test_missing_outgroup() {
        let mut tree = Tree::from_newick("((A:1,B:2):3,C:4);").unwrap();

        assert_eq!(
            tree.root_with_outgroup("Z"),
            Err(PhyloError::TaxonNotFound("Z".to_string()))
        );
    }

    #[test]
    fn test_reroot_random_trees_keeps_structure() {
        let mut rng = StdRng::seed_from_u64(31);

        for n_taxa in [3, 4, 5, 10, 50] {
            let mut tree =
                Tree::generate_random_topology(None, Some(n_taxa), &mut rng)
                    .unwrap();

            tree.root_with_outgroup("S0").unwrap();

            let outgroup = tree.terminal_by_name("S0").unwrap();
            assert_eq!(tree.get_parent(outgroup), Some(tree.root()));
            assert_eq!(tree.n_taxa(), n_taxa);
            assert_eq!(tree.parents().len(), 2 * n_taxa - 2);
            assert_eq!(tree.nonterminals_postorder().len(), n_taxa - 1);
        }
    }
}

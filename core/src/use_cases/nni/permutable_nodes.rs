use crate::domain::dtos::{
    errors::PhyloError, traversal::NodeId, tree::Tree,
};

/// The three subtrees exchanged around a pivot clade.
///
/// The first two are the pivot children. The third is the pivot sibling,
/// unless the pivot hangs from the root: then the edge crossed by the
/// interchange continues into the sibling, and its first child is used.
pub fn permutable_nodes(
    tree: &Tree,
    node: NodeId,
) -> Result<[NodeId; 3], PhyloError> {
    let (first, second) = match tree.clade(node).children.as_slice() {
        [first, second] => (*first, *second),
        _ => {
            return Err(PhyloError::MalformedTopology(format!(
                "clade {node} is not an internal binary clade"
            )))
        }
    };

    let parent = tree.get_parent(node).ok_or_else(|| {
        PhyloError::MalformedTopology(
            "the root is not an NNI pivot".to_string(),
        )
    })?;

    let sibling = tree.get_sibling(node).ok_or_else(|| {
        PhyloError::MalformedTopology(format!("clade {node} has no sibling"))
    })?;

    let third = if parent == tree.root() {
        *tree.clade(sibling).children.first().ok_or_else(|| {
            PhyloError::MalformedTopology(format!(
                "clade {node} hangs from the root next to a terminal"
            ))
        })?
    } else {
        sibling
    };

    Ok([first, second, third])
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dtos::tree::tests::balanced_four;
    use crate::domain::dtos::traversal::RootedTopology;

    #[test]
    fn test_root_child_pivot_uses_first_nibling() {
        let tree = balanced_four();
        let root_children = tree.children_of(tree.root()).to_vec();
        let (node, sibling) = (root_children[1], root_children[0]);

        let permutable = permutable_nodes(&tree, node).unwrap();

        assert_eq!(&permutable[..2], tree.children_of(node));
        assert_eq!(permutable[2], tree.children_of(sibling)[0]);
    }

    #[test]
    fn test_deep_pivot_uses_sibling() {
        let tree = Tree::from_newick("(((A:1,B:1):1,C:1):1,D:1);").unwrap();
        let a = tree.terminal_by_name("A").unwrap();
        let node = tree.get_parent(a).unwrap();

        let permutable = permutable_nodes(&tree, node).unwrap();

        assert_eq!(permutable[2], tree.terminal_by_name("C").unwrap());
    }

    #[test]
    fn test_root_and_terminals_are_rejected() {
        let tree = balanced_four();

        assert!(permutable_nodes(&tree, tree.root()).is_err());
        assert!(
            permutable_nodes(&tree, tree.terminal_by_name("A").unwrap())
                .is_err()
        );
    }
}

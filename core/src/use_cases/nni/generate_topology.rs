use crate::domain::dtos::{
    errors::PhyloError, traversal::NodeId, tree::Tree,
};

/// Build the tree obtained by regrafting the three permutable subtrees of
/// `node` in the order given by `permuted`.
///
/// The first two subtrees become the pivot children. The third replaces the
/// pivot sibling, or the first child of the sibling when the pivot hangs from
/// the root. The source tree is left untouched and the parent mapping of the
/// returned tree is rebuilt. Likelihood caches are not copied.
pub fn generate_topology(
    tree: &Tree,
    node: NodeId,
    permuted: &[NodeId; 3],
) -> Result<Tree, PhyloError> {
    let parent = tree.get_parent(node).ok_or_else(|| {
        PhyloError::MalformedTopology(
            "the root is not an NNI pivot".to_string(),
        )
    })?;

    let mut nni_tree = tree.clone_without_caches();
    nni_tree.set_children(node, vec![permuted[0], permuted[1]]);

    if parent == tree.root() {
        let sibling = tree.get_sibling(node).ok_or_else(|| {
            PhyloError::MalformedTopology(format!(
                "clade {node} has no sibling"
            ))
        })?;

        let second_nibling = match tree.clade(sibling).children.as_slice() {
            [_, second] => *second,
            _ => {
                return Err(PhyloError::MalformedTopology(format!(
                    "sibling of clade {node} is not an internal binary clade"
                )))
            }
        };

        nni_tree.set_children(sibling, vec![permuted[2], second_nibling]);
    } else {
        nni_tree.set_children(parent, vec![node, permuted[2]]);
    }

    nni_tree.refresh_index()?;

    Ok(nni_tree)
}

// ? ---------------------------------------------------------------------------
// ? TESTS
// ? ---------------------------------------------------------------------------

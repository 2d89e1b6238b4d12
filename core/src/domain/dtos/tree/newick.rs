use super::Tree;
use crate::domain::dtos::{
    clade::Clade, errors::PhyloError, traversal::NodeId,
};

use mycelium_base::utils::errors::{execution_err, MappedErrors};
use phylotree::tree::Tree as PhyloTree;
use std::{ffi::OsStr, fs::read_to_string, path::Path};

impl Tree {
    /// Create a new Tree from a .newick file.
    ///
    /// The phylotree::tree::Tree is parsed from the file and converted to the
    /// clade arena. The tree is named after the file.
    pub fn from_file(tree_path: &Path) -> Result<Tree, MappedErrors> {
        if !matches!(
            tree_path.extension().and_then(OsStr::to_str),
            Some("nwk" | "newick" | "tree")
        ) {
            return execution_err(format!(
                "Unexpected tree file extension: {:?}",
                tree_path
            ))
            .as_error();
        }

        let newick_content = match read_to_string(tree_path) {
            Err(err) => {
                return execution_err(format!("Could not read file: {err}"))
                    .as_error()
            }
            Ok(content) => content,
        };

        let mut tree = match Self::from_newick(newick_content.trim()) {
            Err(err) => return execution_err(err.to_string()).as_error(),
            Ok(tree) => tree,
        };

        if let Some(name) = tree_path.file_name().and_then(OsStr::to_str) {
            tree.name = name.to_string();
        }

        Ok(tree)
    }

    /// Parse a rooted binary tree in Newick format.
    pub fn from_newick(newick: &str) -> Result<Tree, PhyloError> {
        let tree = PhyloTree::from_newick(newick).map_err(|err| {
            PhyloError::MalformedTopology(format!(
                "could not parse tree: {err:?}"
            ))
        })?;

        let root = tree.get_root().map_err(|err| {
            PhyloError::MalformedTopology(format!(
                "could not get root: {err:?}"
            ))
        })?;

        let mut clades = Vec::<Clade>::new();
        Self::get_children_nodes(&tree, &root, &mut clades)?;

        let root_clade = &mut clades[0];
        root_clade.length = None;
        if root_clade.name.is_none() {
            root_clade.name = Some("Root".to_string());
        }

        Tree::from_arena("UnnamedTree".to_string(), clades, 0)
    }

    /// Recursively copy a phylotree node and its descendants into the arena,
    /// returning the arena index of the node.
    fn get_children_nodes(
        tree: &PhyloTree,
        node_id: &usize,
        clades: &mut Vec<Clade>,
    ) -> Result<NodeId, PhyloError> {
        let node = tree.get(node_id).map_err(|err| {
            PhyloError::MalformedTopology(format!("node not found: {err:?}"))
        })?;

        let id = clades.len();

        //
        // Tips become named terminal clades.
        //
        if node.is_tip() {
            let name = node.name.clone().ok_or_else(|| {
                PhyloError::MalformedTopology(format!(
                    "tip {node_id} has no name"
                ))
            })?;

            clades.push(Clade::new_leaf(id, name, node.parent_edge));
            return Ok(id);
        }

        //
        // Otherwise the node is reserved first and its children are attached
        // once they are all in the arena.
        //
        clades.push(Clade::new_internal(
            id,
            node.name.clone().filter(|name| !name.is_empty()),
            node.parent_edge,
            Vec::new(),
        ));

        let mut children = Vec::new();
        for child_id in node.children.iter() {
            children.push(Self::get_children_nodes(tree, child_id, clades)?);
        }

        clades[id].children = children;

        Ok(id)
    }

    /// Serialize the tree in Newick format, branch lengths included.
    pub fn to_newick(&self) -> String {
        let mut newick = String::new();
        self.write_newick(self.root, &mut newick, true);
        newick.push(';');
        newick
    }

    fn write_newick(&self, id: NodeId, out: &mut String, with_lengths: bool) {
        let clade = &self.clades[id];

        if !clade.children.is_empty() {
            out.push('(');
            for (i, child) in clade.children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.write_newick(*child, out, with_lengths);
            }
            out.push(')');
        }

        if clade.is_leaf() {
            if let Some(name) = clade.name.as_deref() {
                out.push_str(&quote_label(name));
            }
        }

        if with_lengths && id != self.root {
            out.push_str(&format!(":{}", clade.branch_length()));
        }
    }

    /// Canonical form of the rooted topology.
    ///
    /// Newick without branch lengths or internal labels, where the children
    /// of every clade are sorted, so two trees share a signature exactly when
    /// they share a rooted topology.
    pub fn topology_signature(&self) -> String {
        let mut signature = self.clade_signature(self.root);
        signature.push(';');
        signature
    }

    fn clade_signature(&self, id: NodeId) -> String {
        let clade = &self.clades[id];

        if clade.children.is_empty() {
            return quote_label(clade.name.as_deref().unwrap_or_default());
        }

        let mut children: Vec<String> = clade
            .children
            .iter()
            .map(|child| self.clade_signature(*child))
            .collect();

        children.sort();

        format!("({})", children.join(","))
    }
}

/// Quote labels holding Newick control characters.
fn quote_label(label: &str) -> String {
    if label
        .chars()
        .any(|c| c.is_whitespace() || "():;,[]'".contains(c))
    {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

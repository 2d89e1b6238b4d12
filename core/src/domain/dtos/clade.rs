use super::{alphabet::StateVector, sequence::SequenceBody, traversal::NodeId};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    /// The root of the tree
    Root,

    /// An internal node
    Node,

    /// A terminal node
    Leaf,
}

/// A node of a rooted binary tree stored in the tree arena.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clade {
    pub id: NodeId,

    /// Terminal names are unique inside a tree. Internal clades are usually
    /// unnamed and the root is named `Root`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub kind: NodeType,

    /// Length of the branch above the clade. Meaningless for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,

    /// Either empty (terminal) or exactly two clades (internal).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,

    /// Observed sequence of a terminal, or a simulated ancestral sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceBody>,

    /// Number of sites differing from the parent sequence, filled when the
    /// sequence was simulated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutations: Option<usize>,

    /// Per-site conditional likelihood of the subtree below the clade.
    #[serde(skip)]
    pub(crate) conditional: Vec<StateVector>,

    /// Conditional likelihood propagated through the branch above the clade.
    #[serde(skip)]
    pub(crate) weighted: Vec<StateVector>,
}

impl Clade {
    pub(crate) fn new_root(id: NodeId, children: Vec<NodeId>) -> Clade {
        Clade {
            id,
            name: Some("Root".to_string()),
            kind: NodeType::Root,
            length: None,
            children,
            sequence: None,
            mutations: None,
            conditional: Vec::new(),
            weighted: Vec::new(),
        }
    }

    pub(crate) fn new_leaf(
        id: NodeId,
        name: String,
        length: Option<f64>,
    ) -> Clade {
        Clade {
            id,
            name: Some(name),
            kind: NodeType::Leaf,
            length,
            children: Vec::new(),
            sequence: None,
            mutations: None,
            conditional: Vec::new(),
            weighted: Vec::new(),
        }
    }

    pub(crate) fn new_internal(
        id: NodeId,
        name: Option<String>,
        length: Option<f64>,
        children: Vec<NodeId>,
    ) -> Clade {
        Clade {
            id,
            name,
            kind: NodeType::Node,
            length,
            children,
            sequence: None,
            mutations: None,
            conditional: Vec::new(),
            weighted: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeType::Root
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeType::Leaf
    }

    pub fn is_internal(&self) -> bool {
        self.kind == NodeType::Node
    }

    pub fn branch_length(&self) -> f64 {
        self.length.unwrap_or(0.0)
    }

    /// The per-site conditional likelihood left by the last evaluation.
    pub fn conditional_likelihood(&self) -> &[StateVector] {
        &self.conditional
    }

    pub(crate) fn clear_caches(&mut self) {
        self.conditional.clear();
        self.weighted.clear();
    }

    /// Copy of the clade without the likelihood caches.
    pub(crate) fn clone_without_caches(&self) -> Clade {
        Clade {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            length: self.length,
            children: self.children.clone(),
            sequence: self.sequence.clone(),
            mutations: self.mutations,
            conditional: Vec::new(),
            weighted: Vec::new(),
        }
    }

    /// Copy of the clade holding only its name, branch and children.
    pub(crate) fn clone_topology(&self) -> Clade {
        Clade {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            length: self.length,
            children: self.children.clone(),
            sequence: None,
            mutations: None,
            conditional: Vec::new(),
            weighted: Vec::new(),
        }
    }
}

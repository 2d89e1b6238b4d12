mod newick;
mod random;
mod reroot;

use super::{
    branch_length::BranchLengthDistribution,
    clade::{Clade, NodeType},
    errors::PhyloError,
    sequence::{Sequence, SequenceBody, SequenceCodec},
    substitution_model::JukesCantor,
    traversal::{NodeId, RootedTopology},
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// How branch lengths are assigned after being drawn.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum BranchLengthMode {
    /// Every edge keeps its independent draw.
    #[default]
    Free,

    /// Terminal edges are stretched so every tip sits at the same distance
    /// from the root.
    Ultrametric,
}

/// A rooted binary phylogenetic tree.
///
/// Clades live in an arena owned by the tree and reference each other by
/// index, so cloning a tree is a bulk copy of the arena. The child-to-parent
/// mapping is derived from the children lists and rebuilt after every
/// structural edit; it is never edited directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TreeRecord")]
pub struct Tree {
    /// The human-readable name for the tree.
    pub name: String,

    root: NodeId,

    clades: Vec<Clade>,

    #[serde(skip)]
    parents: BTreeMap<NodeId, NodeId>,

    n_taxa: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    total_length: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    log_likelihood: Option<f64>,
}

/// Serialized form of a tree; the derived indices are rebuilt on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRecord {
    name: String,
    root: NodeId,
    clades: Vec<Clade>,
    #[serde(default)]
    log_likelihood: Option<f64>,
}

impl TryFrom<TreeRecord> for Tree {
    type Error = PhyloError;

    fn try_from(record: TreeRecord) -> Result<Self, Self::Error> {
        let mut tree =
            Tree::from_arena(record.name, record.clades, record.root)?;
        tree.log_likelihood = record.log_likelihood;
        Ok(tree)
    }
}

impl RootedTopology for Tree {
    fn root_id(&self) -> NodeId {
        self.root
    }

    fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.clades[id].children
    }
}

impl Tree {
    /// Build a tree from an arena of clades.
    ///
    /// The clade at position `i` must carry the id `i`. The parent mapping,
    /// the clade kinds and the number of taxa are derived from the children
    /// lists, which must describe a rooted binary tree.
    pub fn from_arena(
        name: String,
        clades: Vec<Clade>,
        root: NodeId,
    ) -> Result<Tree, PhyloError> {
        if let Some((position, clade)) =
            clades.iter().enumerate().find(|(i, c)| c.id != *i)
        {
            return Err(PhyloError::MalformedTopology(format!(
                "clade stored at position {} has id {}",
                position, clade.id
            )));
        }

        if root >= clades.len() {
            return Err(PhyloError::MalformedTopology(format!(
                "root {root} is outside the arena"
            )));
        }

        let mut tree = Tree {
            name,
            root,
            clades,
            parents: BTreeMap::new(),
            n_taxa: 0,
            total_length: None,
            log_likelihood: None,
        };

        tree.refresh_index()?;

        Ok(tree)
    }

    /// Rebuild the parent mapping, the clade kinds and `n_taxa` from the
    /// children lists, validating the structure on the way.
    pub(crate) fn refresh_index(&mut self) -> Result<(), PhyloError> {
        let n_clades = self.clades.len();
        let mut parents = BTreeMap::new();
        let mut visited = vec![false; n_clades];
        let mut stack = vec![self.root];

        visited[self.root] = true;

        while let Some(id) = stack.pop() {
            let children = &self.clades[id].children;

            if !(children.is_empty() || children.len() == 2) {
                return Err(PhyloError::MalformedTopology(format!(
                    "clade {id} has {} children",
                    children.len()
                )));
            }

            for child in children.iter().copied() {
                if child >= n_clades {
                    return Err(PhyloError::MalformedTopology(format!(
                        "clade {id} points to missing clade {child}"
                    )));
                }

                if visited[child] {
                    return Err(PhyloError::MalformedTopology(format!(
                        "clade {child} is reachable more than once"
                    )));
                }

                visited[child] = true;
                parents.insert(child, id);
                stack.push(child);
            }
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(PhyloError::MalformedTopology(format!(
                "clade {orphan} is not reachable from the root"
            )));
        }

        if self.clades[self.root].children.is_empty() {
            return Err(PhyloError::MalformedTopology(
                "the root has no children".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut n_taxa = 0;

        for clade in self.clades.iter_mut() {
            clade.kind = if clade.id == self.root {
                NodeType::Root
            } else if clade.children.is_empty() {
                NodeType::Leaf
            } else {
                NodeType::Node
            };

            if clade.kind != NodeType::Leaf {
                continue;
            }

            n_taxa += 1;

            match clade.name.as_deref() {
                None | Some("") => {
                    return Err(PhyloError::MalformedTopology(format!(
                        "terminal clade {} has no name",
                        clade.id
                    )))
                }
                Some(name) => {
                    if !names.insert(name.to_string()) {
                        return Err(PhyloError::MalformedTopology(format!(
                            "terminal name {name} is duplicated"
                        )));
                    }
                }
            }
        }

        self.parents = parents;
        self.n_taxa = n_taxa;

        Ok(())
    }

    // ? -----------------------------------------------------------------------
    // ? Accessors
    // ? -----------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn n_taxa(&self) -> usize {
        self.n_taxa
    }

    pub fn clades(&self) -> &[Clade] {
        &self.clades
    }

    pub fn clade(&self, id: NodeId) -> &Clade {
        &self.clades[id]
    }

    /// The derived child-to-parent mapping. Holds every non-root clade.
    pub fn parents(&self) -> &BTreeMap<NodeId, NodeId> {
        &self.parents
    }

    pub fn get_parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// The other child of the parent of `id`. `None` for the root.
    pub fn get_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get_parent(id)?;

        self.clades[parent]
            .children
            .iter()
            .find(|child| **child != id)
            .copied()
    }

    pub fn terminal_names(&self) -> Vec<String> {
        self.terminals()
            .into_iter()
            .filter_map(|id| self.clades[id].name.clone())
            .collect()
    }

    /// Find a terminal clade by name.
    pub fn terminal_by_name(&self, name: &str) -> Result<NodeId, PhyloError> {
        self.clades
            .iter()
            .find(|clade| {
                clade.is_leaf() && clade.name.as_deref() == Some(name)
            })
            .map(|clade| clade.id)
            .ok_or_else(|| PhyloError::TaxonNotFound(name.to_string()))
    }

    /// Log-likelihood left by the last evaluation, if still valid.
    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    pub(crate) fn set_log_likelihood(&mut self, log_likelihood: f64) {
        self.log_likelihood = Some(log_likelihood);
    }

    /// Length of the shared sequences, taken from the first terminal.
    pub fn seq_len(&self) -> Option<usize> {
        self.terminals()
            .into_iter()
            .find_map(|id| self.clades[id].sequence.as_ref().map(|s| s.len()))
    }

    pub(crate) fn clade_mut(&mut self, id: NodeId) -> &mut Clade {
        &mut self.clades[id]
    }

    /// Replace the children of a clade without touching the parent mapping.
    ///
    /// Callers must run `refresh_index` once their edit is complete.
    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.clades[id].children = children;
        self.invalidate();
    }

    /// Drop every value derived from branch lengths or topology.
    fn invalidate(&mut self) {
        self.total_length = None;
        self.log_likelihood = None;
    }

    /// Drop the per-clade likelihood caches.
    pub fn clear_caches(&mut self) {
        self.clades.iter_mut().for_each(Clade::clear_caches);
    }

    /// Copy the tree keeping the clamped sequences but not the likelihood
    /// caches.
    pub fn clone_without_caches(&self) -> Tree {
        self.clone_with(Clade::clone_without_caches)
    }

    /// Copy the tree as a chain sample.
    ///
    /// A sample holds the topology and the branch lengths only. Sequences,
    /// mutation counts and likelihood caches are left behind. The cached
    /// log-likelihood and total length are kept.
    pub fn to_sample(&self) -> Tree {
        self.clone_with(Clade::clone_topology)
    }

    fn clone_with(&self, clone_clade: fn(&Clade) -> Clade) -> Tree {
        Tree {
            name: self.name.clone(),
            root: self.root,
            clades: self.clades.iter().map(clone_clade).collect(),
            parents: self.parents.clone(),
            n_taxa: self.n_taxa,
            total_length: self.total_length,
            log_likelihood: self.log_likelihood,
        }
    }

    // ? -----------------------------------------------------------------------
    // ? Branch lengths
    // ? -----------------------------------------------------------------------

    /// Sum of the branch lengths of every non-root clade.
    pub fn calculate_total_tree_length(&self) -> f64 {
        self.clades
            .iter()
            .filter(|clade| clade.id != self.root)
            .map(|clade| clade.branch_length())
            .sum()
    }

    /// Total tree length, served from the cache when available.
    pub fn total_length(&self) -> f64 {
        self.total_length
            .unwrap_or_else(|| self.calculate_total_tree_length())
    }

    /// Cumulative branch length from the root down to `id`.
    pub fn distance(&self, id: NodeId) -> f64 {
        let mut distance = 0.0;
        let mut current = id;

        while let Some(parent) = self.get_parent(current) {
            distance += self.clades[current].branch_length();
            current = parent;
        }

        distance
    }

    /// Assign every non-root edge an independent draw of `distribution`.
    pub fn generate_random_branch_lengths<R: Rng + ?Sized>(
        &mut self,
        distribution: &BranchLengthDistribution,
        mode: BranchLengthMode,
        rng: &mut R,
    ) {
        for id in self.preorder() {
            if id == self.root {
                continue;
            }

            self.clades[id].length = Some(distribution.sample(rng));
        }

        if let BranchLengthMode::Ultrametric = mode {
            self.make_tree_ultrametric();
        }

        self.invalidate();
        self.total_length = Some(self.calculate_total_tree_length());
    }

    /// Stretch terminal edges so every tip is as far from the root as the
    /// deepest one.
    ///
    /// The target depth is the maximum root-to-tip distance, which is never
    /// shorter than the depth of any terminal parent, so the adjusted lengths
    /// stay non-negative. Internal edges keep their lengths.
    pub fn make_tree_ultrametric(&mut self) {
        let terminals = self.terminals();

        let present = terminals
            .iter()
            .map(|id| self.distance(*id))
            .fold(0.0_f64, f64::max);

        for id in terminals {
            let Some(parent) = self.get_parent(id) else {
                continue;
            };

            let length = present - self.distance(parent);
            debug_assert!(length > -1e-12, "negative terminal length {length}");

            self.clades[id].length = Some(length.max(0.0));
        }

        self.invalidate();
    }

    // ? -----------------------------------------------------------------------
    // ? Sequences
    // ? -----------------------------------------------------------------------

    /// Attach observed sequences to the terminals with matching names.
    ///
    /// Every terminal must receive exactly one sequence, every sequence must
    /// match a terminal, and all of them must share one length over the
    /// codec alphabet.
    pub fn clamp_sequences(
        &mut self,
        sequences: &[Sequence],
        codec: &SequenceCodec,
    ) -> Result<(), PhyloError> {
        let mut by_name = HashMap::new();
        let mut seq_len = None;

        for sequence in sequences.iter() {
            codec.sequence_to_index(sequence.sequence_content())?;

            let len = sequence.sequence().len();
            match seq_len {
                None => seq_len = Some(len),
                Some(expected) if expected != len => {
                    return Err(PhyloError::MalformedTopology(format!(
                        "sequence {} has length {len}, expected {expected}",
                        sequence.header_content()
                    )))
                }
                _ => (),
            }

            self.terminal_by_name(sequence.header_content())?;
            by_name.insert(sequence.header_content(), sequence.sequence());
        }

        for id in self.terminals() {
            let name = self.clades[id].name.clone().unwrap_or_default();

            let body = by_name
                .get(name.as_str())
                .ok_or_else(|| PhyloError::TaxonNotFound(name.clone()))?;

            self.clades[id].sequence = Some((*body).clone());
        }

        self.log_likelihood = None;

        Ok(())
    }

    /// Simulate sequences down the tree.
    ///
    /// The root sequence is drawn uniformly and every child sequence is
    /// evolved from its parent along the child branch. Each clade records the
    /// number of mutations relative to its parent.
    pub fn generate_sequences<R: Rng + ?Sized>(
        &mut self,
        seq_len: usize,
        codec: &SequenceCodec,
        model: &JukesCantor,
        rng: &mut R,
    ) -> Result<(), PhyloError> {
        let root_sequence = codec.generate_sequence(seq_len, None, rng);
        self.clades[self.root].sequence =
            Some(SequenceBody::new(root_sequence));

        for parent in self.preorder() {
            let Some(parent_sequence) = self.clades[parent].sequence.clone()
            else {
                continue;
            };

            for child in self.clades[parent].children.clone() {
                let child_sequence = codec.generate_child_from_parent(
                    parent_sequence.seq(),
                    self.clades[child].branch_length(),
                    model,
                    rng,
                )?;

                let mutations = codec
                    .count_mutations(parent_sequence.seq(), &child_sequence);

                let clade = &mut self.clades[child];
                clade.sequence = Some(SequenceBody::new(child_sequence));
                clade.mutations = Some(mutations);
            }
        }

        self.log_likelihood = None;

        Ok(())
    }

    /// Observed terminal sequences, keyed by terminal name.
    pub fn terminal_sequences(&self) -> Vec<Sequence> {
        self.terminals()
            .into_iter()
            .filter_map(|id| {
                let clade = &self.clades[id];
                Some(Sequence::new(
                    clade.name.clone()?,
                    clade.sequence.as_ref()?.seq().to_string(),
                ))
            })
            .collect()
    }

    // ? -----------------------------------------------------------------------
    // ? Display
    // ? -----------------------------------------------------------------------

    /// Pretty print the tree.
    ///
    /// The function prints the tree in a human-readable format. The function
    /// prints the root node and recursively prints each child node.
    pub fn pretty_print(&self) {
        println!("R: {} ({} taxa)", self.name, self.n_taxa);

        for child in self.clades[self.root].children.iter() {
            self.pretty_print_clade(*child, 0);
        }
    }

    fn pretty_print_clade(&self, id: NodeId, level: usize) {
        let indent = "  ".repeat(level);
        let clade = &self.clades[id];

        if clade.is_leaf() {
            println!(
                "{}L:{}  {} ({:.6})",
                indent,
                id,
                clade.name.as_deref().unwrap_or("Unnamed"),
                clade.branch_length()
            );
        } else {
            println!("{}I:{} ({:.6})", indent, id, clade.branch_length());
        }

        for child in clade.children.iter() {
            self.pretty_print_clade(*child, level + 1);
        }
    }
}

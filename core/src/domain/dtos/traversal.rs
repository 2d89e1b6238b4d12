use std::collections::VecDeque;

/// Index of a clade inside the arena of the tree that owns it.
///
/// Indices are stable across clones of the same tree, so a clade selected on
/// one tree addresses the same clade on any of its copies.
pub type NodeId = usize;

/// Traversals over a rooted tree addressed by arena indices.
///
/// Implementors only expose the root and the children of each node; every
/// traversal order is derived from those two accessors. Children are always
/// visited in their stored order.
pub trait RootedTopology {
    fn root_id(&self) -> NodeId;

    fn children_of(&self, id: NodeId) -> &[NodeId];

    fn is_terminal(&self, id: NodeId) -> bool {
        self.children_of(id).is_empty()
    }

    /// Depth-first order, each node before its descendants.
    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root_id()];

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children_of(id).iter().rev());
        }

        order
    }

    /// Depth-first order, each node after all of its descendants.
    fn postorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(self.root_id(), false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }

            stack.push((id, true));
            for child in self.children_of(id).iter().rev() {
                stack.push((*child, false));
            }
        }

        order
    }

    /// Breadth-first order starting at the root.
    fn levelorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.root_id()]);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.children_of(id).iter());
        }

        order
    }

    /// Terminal nodes, left to right.
    fn terminals(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.is_terminal(*id))
            .collect()
    }

    /// Internal nodes (root included) in postorder.
    fn nonterminals_postorder(&self) -> Vec<NodeId> {
        self.postorder()
            .into_iter()
            .filter(|id| !self.is_terminal(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((0,1)3,2)4 stored as an adjacency list.
    struct Adjacency(Vec<Vec<NodeId>>, NodeId);

    impl RootedTopology for Adjacency {
        fn root_id(&self) -> NodeId {
            self.1
        }

        fn children_of(&self, id: NodeId) -> &[NodeId] {
            &self.0[id]
        }
    }

    fn example() -> Adjacency {
        Adjacency(vec![vec![], vec![], vec![], vec![0, 1], vec![3, 2]], 4)
    }

    #[test]
    fn test_orders() {
        let tree = example();

        assert_eq!(tree.preorder(), vec![4, 3, 0, 1, 2]);
        assert_eq!(tree.postorder(), vec![0, 1, 3, 2, 4]);
        assert_eq!(tree.levelorder(), vec![4, 3, 2, 0, 1]);
        assert_eq!(tree.terminals(), vec![0, 1, 2]);
        assert_eq!(tree.nonterminals_postorder(), vec![3, 4]);
    }
}

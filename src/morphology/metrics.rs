//! Read-only tree metrics consumed by the layout and the checks.
//!
//! All walks use an explicit stack so arbitrarily deep reconstructions do
//! not exhaust the call stack.

use super::{Neurite, Node, NodeId};
use crate::geometry::Point;

/// Depth-first, parent-before-children iterator over a neurite.
pub struct PreOrder<'a> {
    neurite: &'a Neurite,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.neurite.nodes[id];
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

impl Neurite {
    /// Nodes in pre-order, children visited in their stored order.
    pub fn iter_preorder(&self) -> PreOrder<'_> {
        PreOrder {
            neurite: self,
            stack: vec![self.root],
        }
    }

    /// Number of segments: consecutive samples inside each section plus
    /// one link from every parent tip to its child's first sample.
    pub fn segment_count(&self) -> usize {
        let inner: usize = self
            .nodes
            .iter()
            .map(|node| node.samples.len() - 1)
            .sum();
        inner + self.nodes.len() - 1
    }

    /// Number of nodes with two or more children.
    pub fn bifurcation_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_bifurcation()).count()
    }

    /// Number of leaves in the whole neurite.
    pub fn termination_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Leaf count of the subtree below every node, indexed by [`NodeId`].
    pub fn termination_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        let order: Vec<NodeId> = self.iter_preorder().map(Node::id).collect();

        // Reverse pre-order visits every child before its parent.
        for &id in order.iter().rev() {
            let node = &self.nodes[id];
            counts[id] = if node.is_leaf() {
                1
            } else {
                node.children.iter().map(|&c| counts[c]).sum()
            };
        }
        counts
    }

    /// Leaf count of the subtree rooted at `id`.
    pub fn subtree_termination_count(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if node.is_leaf() {
                count += 1;
            }
            stack.extend(node.children.iter().copied());
        }
        count
    }

    /// Positions of every sample of every section.
    pub fn points(&self) -> Vec<Point> {
        self.nodes
            .iter()
            .flat_map(|node| node.samples.iter().map(|s| s.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::morphology::test_support::fork;
    use crate::morphology::{Neurite, NeuriteType, Sample};

    fn ternary_with_sections() -> Neurite {
        let mut neurite = Neurite::new(
            NeuriteType::Axon,
            vec![Sample::new(0.0, 0.0, 0.0, 1.0), Sample::new(0.0, 1.0, 0.0, 1.0)],
        )
        .unwrap();
        let a = neurite
            .add_child(
                0,
                vec![
                    Sample::new(0.0, 2.0, 0.0, 1.0),
                    Sample::new(0.0, 3.0, 0.0, 1.0),
                    Sample::new(0.0, 4.0, 0.0, 1.0),
                ],
            )
            .unwrap();
        neurite.add_child(0, vec![Sample::new(1.0, 1.0, 0.0, 1.0)]).unwrap();
        neurite.add_child(0, vec![Sample::new(-1.0, 1.0, 0.0, 1.0)]).unwrap();
        neurite.add_child(a, vec![Sample::new(1.0, 4.0, 0.0, 1.0)]).unwrap();
        neurite.add_child(a, vec![Sample::new(-1.0, 4.0, 0.0, 1.0)]).unwrap();
        neurite
    }

    #[test]
    fn counts_on_simple_fork() {
        let neurite = fork();
        assert_eq!(neurite.segment_count(), 2);
        assert_eq!(neurite.bifurcation_count(), 1);
        assert_eq!(neurite.termination_count(), 2);
        assert_eq!(neurite.termination_counts(), vec![2, 1, 1]);
    }

    #[test]
    fn counts_include_section_interiors() {
        let neurite = ternary_with_sections();
        // 1 + 2 inner segments, 5 links
        assert_eq!(neurite.segment_count(), 8);
        assert_eq!(neurite.bifurcation_count(), 2);
        assert_eq!(neurite.termination_count(), 4);
        assert_eq!(neurite.termination_counts(), vec![4, 2, 1, 1, 1, 1]);
        assert_eq!(neurite.subtree_termination_count(1), 2);
        assert_eq!(neurite.subtree_termination_count(0), 4);
        assert_eq!(neurite.points().len(), 9);
    }

    #[test]
    fn preorder_visits_parents_first_in_child_order() {
        let neurite = ternary_with_sections();
        let order: Vec<_> = neurite.iter_preorder().map(|n| n.id()).collect();
        assert_eq!(order, vec![0, 1, 4, 5, 2, 3]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut neurite =
            Neurite::new(NeuriteType::Axon, vec![Sample::new(0.0, 0.0, 0.0, 1.0)]).unwrap();
        let mut parent = 0;
        for i in 1..100_000 {
            parent = neurite
                .add_child(parent, vec![Sample::new(0.0, 0.0, i as f64, 1.0)])
                .unwrap();
        }
        assert_eq!(neurite.iter_preorder().count(), 100_000);
        assert_eq!(neurite.termination_counts()[0], 1);
        assert_eq!(neurite.subtree_termination_count(0), 1);
    }
}

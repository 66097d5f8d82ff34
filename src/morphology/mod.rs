use std::fmt;

use crate::error::{MorphError, Result};
use crate::geometry::Point;

pub mod metrics;

pub use metrics::PreOrder;

/// Index of a node inside its neurite's arena.
pub type NodeId = usize;

/// One reconstructed sample: a position and the radius of the process there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point,
    pub radius: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self {
            position: Point::new(x, y, z),
            radius,
        }
    }

    fn is_finite(&self) -> bool {
        self.radius.is_finite() && self.position.iter().all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeuriteType {
    Axon,
    BasalDendrite,
    ApicalDendrite,
    Undefined,
}

impl fmt::Display for NeuriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeuriteType::Axon => write!(f, "Axon"),
            NeuriteType::BasalDendrite => write!(f, "Basal dendrite"),
            NeuriteType::ApicalDendrite => write!(f, "Apical dendrite"),
            NeuriteType::Undefined => write!(f, "Undefined"),
        }
    }
}

/// Unbranched section of a neurite together with its links.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    samples: Vec<Sample>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Detached node; links are filled in by [`Neurite::from_nodes`].
    pub fn new(id: NodeId, samples: Vec<Sample>, parent: Option<NodeId>, children: Vec<NodeId>) -> Self {
        Self {
            id,
            samples,
            parent,
            children,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_bifurcation(&self) -> bool {
        self.children.len() >= 2
    }

    /// First sample of the section. Sections are never empty.
    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    /// Last sample of the section, where children attach.
    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }
}

/// A typed tree of sections rooted at the soma.
///
/// Nodes are stored in an arena indexed by [`NodeId`]. Every node has
/// exactly one parent except the root, and the structure is checked on
/// construction so layout and checks can assume a well-formed tree.
#[derive(Debug, Clone)]
pub struct Neurite {
    neurite_type: NeuriteType,
    root: NodeId,
    nodes: Vec<Node>,
}

impl Neurite {
    /// Start a neurite with a single root section.
    pub fn new(neurite_type: NeuriteType, root_samples: Vec<Sample>) -> Result<Self> {
        check_section(0, &root_samples)?;
        Ok(Self {
            neurite_type,
            root: 0,
            nodes: vec![Node::new(0, root_samples, None, Vec::new())],
        })
    }

    /// Attach a new section below `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, samples: Vec<Sample>) -> Result<NodeId> {
        if parent >= self.nodes.len() {
            return Err(MorphError::UnknownNode(parent));
        }
        let id = self.nodes.len();
        check_section(id, &samples)?;
        self.nodes
            .push(Node::new(id, samples, Some(parent), Vec::new()));
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Build a neurite from an externally assembled arena.
    ///
    /// Fails with [`MorphError::InvalidTreeStructure`] when ids do not match
    /// positions, parent and child links disagree, a node is reachable more
    /// than once (cycles, shared children) or not at all.
    pub fn from_nodes(neurite_type: NeuriteType, root: NodeId, nodes: Vec<Node>) -> Result<Self> {
        if root >= nodes.len() {
            return Err(MorphError::UnknownNode(root));
        }

        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(MorphError::InvalidTreeStructure(format!(
                    "node at position {index} carries id {}",
                    node.id
                )));
            }
            check_section(index, &node.samples)?;
        }

        if let Some(parent) = nodes[root].parent {
            return Err(MorphError::InvalidTreeStructure(format!(
                "root {root} has parent {parent}"
            )));
        }

        let mut visited = vec![false; nodes.len()];
        let mut stack = vec![root];
        visited[root] = true;
        while let Some(id) = stack.pop() {
            for &child in &nodes[id].children {
                if child >= nodes.len() {
                    return Err(MorphError::UnknownNode(child));
                }
                if visited[child] {
                    return Err(MorphError::InvalidTreeStructure(format!(
                        "node {child} is reachable more than once"
                    )));
                }
                if nodes[child].parent != Some(id) {
                    return Err(MorphError::InvalidTreeStructure(format!(
                        "node {child} is a child of {id} but points to parent {:?}",
                        nodes[child].parent
                    )));
                }
                visited[child] = true;
                stack.push(child);
            }
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(MorphError::InvalidTreeStructure(format!(
                "node {orphan} is not reachable from root {root}"
            )));
        }

        Ok(Self {
            neurite_type,
            root,
            nodes,
        })
    }

    pub fn neurite_type(&self) -> NeuriteType {
        self.neurite_type
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)?.parent.map(|p| &self.nodes[p])
    }
}

fn check_section(id: NodeId, samples: &[Sample]) -> Result<()> {
    if samples.is_empty() {
        return Err(MorphError::EmptySection(id));
    }
    if let Some(sample) = samples.iter().position(|s| !s.is_finite()) {
        return Err(MorphError::NonFiniteSample { node: id, sample });
    }
    Ok(())
}

/// A whole cell: soma samples plus its neurites in drawing order.
#[derive(Debug, Clone, Default)]
pub struct Neuron {
    pub name: Option<String>,
    pub soma: Vec<Sample>,
    pub neurites: Vec<Neurite>,
}

impl Neuron {
    pub fn new(name: Option<String>, soma: Vec<Sample>, neurites: Vec<Neurite>) -> Self {
        Self {
            name,
            soma,
            neurites,
        }
    }

    pub fn neurites_of_type(&self, neurite_type: NeuriteType) -> impl Iterator<Item = &Neurite> {
        self.neurites
            .iter()
            .filter(move |n| n.neurite_type() == neurite_type)
    }

    pub fn segment_count(&self) -> usize {
        self.neurites.iter().map(Neurite::segment_count).sum()
    }

    pub fn bifurcation_count(&self) -> usize {
        self.neurites.iter().map(Neurite::bifurcation_count).sum()
    }

    pub fn termination_count(&self) -> usize {
        self.neurites.iter().map(Neurite::termination_count).sum()
    }
}

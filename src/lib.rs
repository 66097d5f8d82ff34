//! Dendrogram layout and quality checks for reconstructed neuron morphologies.
//!
//! A morphology is a set of rooted trees of cylindrical segments. The
//! [`dendrogram`] module turns those trees into flat 4-vertex polygons that
//! can be drawn as a schematic, [`export`] places them side by side and
//! writes them out as SVG, and [`check`] holds geometric predicates used to
//! flag suspicious reconstructions.

pub mod check;
pub mod dendrogram;
pub mod error;
pub mod export;
pub mod geometry;
pub mod morphology;

pub use dendrogram::{Dendrogram, DendrogramConfig, LayoutInput};
pub use error::{MorphError, Result};
pub use morphology::{Neurite, NeuriteType, Neuron, Node, NodeId, Sample};

//! Detection of sections that fold back onto themselves.
//!
//! Every segment of a section is compared with all the earlier segments of
//! the same section. A later segment back-tracks onto an earlier one when
//! the two point in opposing directions and the later segment's end point
//! falls inside the cylinder around the earlier one. Long-range returns
//! across different sections are not considered.

use log::debug;

use crate::geometry::{all_close, vector_projection, Point};
use crate::morphology::{Neurite, NodeId, Sample};

/// Fraction of the earlier segment's length, measured from its centre,
/// within which a projected end point counts as overlapping. Half the
/// length plus a 5% allowance.
pub const OVERLAP_LENGTH_FACTOR: f64 = 0.55;

/// Where a section folds back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackTrack {
    pub node: NodeId,
    /// Index of the earlier segment among the section's non-zero segments.
    pub earlier: usize,
    /// Index of the later, overlapping segment.
    pub later: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Point,
    end: Point,
    max_radius: f64,
}

impl Segment {
    fn new(a: &Sample, b: &Sample) -> Self {
        Self {
            start: a.position,
            end: b.position,
            max_radius: a.radius.max(b.radius),
        }
    }

    fn direction(&self) -> Point {
        self.end - self.start
    }

    fn is_zero_length(&self) -> bool {
        all_close(&self.start, &self.end)
    }
}

fn same_direction(later: &Segment, earlier: &Segment) -> bool {
    earlier.direction().dot(&later.direction()) >= 0.0
}

/// Whether the end point of `later` lies within the cylinder of `earlier`.
fn overlaps(later: &Segment, earlier: &Segment) -> bool {
    let centre = 0.5 * (earlier.start + earlier.end);
    let cp = later.end - centre;
    let axis = earlier.direction();
    let prj = vector_projection(&cp, &axis);

    // Too far from the axis for any overlap.
    if (cp - prj).norm() > later.max_radius + earlier.max_radius {
        return false;
    }

    prj.norm() < OVERLAP_LENGTH_FACTOR * axis.norm()
}

fn is_inside_cylinder(later: &Segment, earlier: &Segment) -> bool {
    !same_direction(later, earlier) && overlaps(later, earlier)
}

/// First back-tracking pair found, walking nodes in pre-order.
pub fn find_back_tracking(neurite: &Neurite) -> Option<BackTrack> {
    for node in neurite.iter_preorder() {
        let samples = node.samples();
        if samples.len() <= 2 {
            continue;
        }

        let segments: Vec<Segment> = samples
            .windows(2)
            .map(|pair| Segment::new(&pair[0], &pair[1]))
            .filter(|segment| !segment.is_zero_length())
            .collect();

        for (later_index, later) in segments.iter().enumerate().skip(1) {
            for (earlier_index, earlier) in segments[..later_index].iter().enumerate() {
                if is_inside_cylinder(later, earlier) {
                    return Some(BackTrack {
                        node: node.id(),
                        earlier: earlier_index,
                        later: later_index,
                    });
                }
            }
        }
    }
    None
}

/// True when any section of the neurite folds back onto itself.
pub fn is_back_tracking(neurite: &Neurite) -> bool {
    match find_back_tracking(neurite) {
        Some(hit) => {
            debug!(
                "node {} back-tracks: segment {} overlaps segment {}",
                hit.node, hit.later, hit.earlier
            );
            true
        }
        None => false,
    }
}

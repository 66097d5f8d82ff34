use log::debug;

use crate::error::{ensure_tolerance, Result};
use crate::morphology::{Neurite, NodeId};

/// First place where the radius grows beyond the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusIncrease {
    pub node: NodeId,
    /// Sample index inside the node's section; `0` means the increase is
    /// across the link from the parent's last sample.
    pub sample: usize,
    pub previous: f64,
    pub current: f64,
}

/// Locate the first radius increase larger than `tol`, walking in pre-order.
pub fn find_non_monotonic(neurite: &Neurite, tol: f64) -> Result<Option<RadiusIncrease>> {
    let tol = ensure_tolerance(tol)?;

    for node in neurite.iter_preorder() {
        let samples = node.samples();
        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].radius > pair[0].radius + tol {
                return Ok(Some(RadiusIncrease {
                    node: node.id(),
                    sample: index + 1,
                    previous: pair[0].radius,
                    current: pair[1].radius,
                }));
            }
        }

        if let Some(parent) = neurite.parent_of(node.id()) {
            let previous = parent.last().radius;
            let current = node.first().radius;
            if current > previous + tol {
                return Ok(Some(RadiusIncrease {
                    node: node.id(),
                    sample: 0,
                    previous,
                    current,
                }));
            }
        }
    }

    Ok(None)
}

/// True when radii never grow by more than `tol` from the root to any tip.
pub fn is_monotonic(neurite: &Neurite, tol: f64) -> Result<bool> {
    let violation = find_non_monotonic(neurite, tol)?;
    if let Some(increase) = &violation {
        debug!(
            "radius increases at node {} sample {}: {} -> {}",
            increase.node, increase.sample, increase.previous, increase.current
        );
    }
    Ok(violation.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphError;
    use crate::morphology::test_support::{fork, straight_section};
    use crate::morphology::{NeuriteType, Sample};

    #[test]
    fn tapering_section_is_monotonic() {
        let neurite = straight_section(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(is_monotonic(&neurite, 0.0).unwrap());
    }

    #[test]
    fn single_increase_breaks_monotonicity() {
        let neurite = straight_section(&[5.0, 4.0, 6.0, 2.0, 1.0]);
        assert!(!is_monotonic(&neurite, 0.0).unwrap());
        assert_eq!(
            find_non_monotonic(&neurite, 0.0).unwrap(),
            Some(RadiusIncrease {
                node: 0,
                sample: 2,
                previous: 4.0,
                current: 6.0
            })
        );
        // an increase within tolerance is accepted
        assert!(is_monotonic(&neurite, 2.0).unwrap());
    }

    #[test]
    fn equal_radii_are_monotonic() {
        let neurite = straight_section(&[2.0, 2.0, 2.0]);
        assert!(is_monotonic(&neurite, 0.0).unwrap());
    }

    #[test]
    fn single_node_tree_is_monotonic() {
        let neurite = straight_section(&[3.0]);
        assert!(is_monotonic(&neurite, 0.0).unwrap());
    }

    #[test]
    fn child_wider_than_parent_tip_is_reported() {
        let mut neurite = Neurite::new(
            NeuriteType::BasalDendrite,
            vec![Sample::new(0.0, 0.0, 0.0, 3.0), Sample::new(1.0, 0.0, 0.0, 1.0)],
        )
        .unwrap();
        neurite.add_child(0, vec![Sample::new(2.0, 0.0, 0.0, 1.0)]).unwrap();
        let wide = neurite
            .add_child(0, vec![Sample::new(2.0, 1.0, 0.0, 1.5)])
            .unwrap();

        assert!(!is_monotonic(&neurite, 0.1).unwrap());
        let increase = find_non_monotonic(&neurite, 0.1).unwrap().unwrap();
        assert_eq!(increase.node, wide);
        assert_eq!(increase.sample, 0);

        assert!(is_monotonic(&neurite, 0.5).unwrap());
    }

    #[test]
    fn tapering_fork_is_monotonic() {
        // root radius 2, children 1 and 0.5
        assert!(is_monotonic(&fork(), 0.0).unwrap());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let neurite = straight_section(&[1.0, 1.0]);
        assert!(matches!(
            is_monotonic(&neurite, -0.1),
            Err(MorphError::InvalidTolerance(_))
        ));
    }
}

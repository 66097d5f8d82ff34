use super::{DendrogramConfig, Extent, Polygon, PolygonKind};
use crate::error::{MorphError, Result};
use crate::geometry::{segment_length, Point};
use crate::morphology::{Neurite, NodeId};

/// Tip of an already placed section, where its children hang from.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    x: f64,
    y: f64,
    radius: f64,
    position: Point,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    node: NodeId,
    x: f64,
    parent: Option<Anchor>,
    connector: bool,
}

/// For each child, whether its centre differs from the parent's.
///
/// A child of weight `t` preceded by siblings of total weight `before` is
/// centred at `parent_x + (2 * before + t - parent_weight) * w / 2`, so the
/// comparison is done on integers and never on accumulated floats.
pub(super) fn connector_flags(
    parent_weight: usize,
    weights: impl Iterator<Item = usize>,
) -> impl Iterator<Item = bool> {
    weights.scan(0usize, move |before, weight| {
        let offset = 2 * *before + weight != parent_weight;
        *before += weight;
        Some(offset)
    })
}

/// State of one neurite's layout: the shared buffer, the write cursor
/// and the running extent.
pub(super) struct LayoutContext<'a> {
    config: &'a DendrogramConfig,
    buffer: &'a mut [Polygon],
    cursor: usize,
    extent: Extent,
}

impl<'a> LayoutContext<'a> {
    pub(super) fn new(config: &'a DendrogramConfig, buffer: &'a mut [Polygon], cursor: usize) -> Self {
        Self {
            config,
            buffer,
            cursor,
            extent: Extent::default(),
        }
    }

    /// Next free index and the extent covered by the neurite.
    pub(super) fn finish(self) -> (usize, Extent) {
        (self.cursor, self.extent)
    }

    /// Place `neurite` with its root at the origin.
    pub(super) fn lay_out(&mut self, neurite: &Neurite) -> Result<()> {
        let terminations = neurite.termination_counts();
        let spacing = self.config.horizontal_spacing;
        let scale = self.config.scale;

        let mut stack = vec![Pending {
            node: neurite.root_id(),
            x: 0.0,
            parent: None,
            connector: false,
        }];

        while let Some(pending) = stack.pop() {
            let node = &neurite.nodes()[pending.node];
            let samples = node.samples();
            let x = pending.x;
            let mut y = 0.0;

            if let Some(anchor) = pending.parent {
                let first = node.first();
                let bottom = self.advance(anchor.y, segment_length(&anchor.position, &first.position));
                self.vertical(x, anchor.y, bottom, anchor.radius, first.radius * scale)?;
                if pending.connector {
                    self.horizontal(anchor.x, x, anchor.y)?;
                }
                y = bottom;
            }

            for pair in samples.windows(2) {
                let bottom = self.advance(y, segment_length(&pair[0].position, &pair[1].position));
                self.vertical(x, y, bottom, pair[0].radius * scale, pair[1].radius * scale)?;
                y = bottom;
            }

            let width = terminations[node.id()] as f64 * spacing;
            self.extent.width = self.extent.width.max(width);

            if node.is_leaf() {
                continue;
            }

            let tip = node.last();
            let anchor = Anchor {
                x,
                y,
                radius: tip.radius * scale,
                position: tip.position,
            };

            let weights = node.children().iter().map(|&c| terminations[c]);
            let flags = connector_flags(terminations[node.id()], weights);

            let mut start = x - width / 2.0;
            let mut children = Vec::with_capacity(node.children().len());
            for (&child, connector) in node.children().iter().zip(flags) {
                let child_width = terminations[child] as f64 * spacing;
                children.push(Pending {
                    node: child,
                    x: start + child_width / 2.0,
                    parent: Some(anchor),
                    connector,
                });
                start += child_width;
            }
            stack.extend(children.into_iter().rev());
        }

        Ok(())
    }

    fn advance(&mut self, y: f64, length: f64) -> f64 {
        let bottom = y + 2.0 * self.config.vertical_spacing + length;
        self.extent.height = self.extent.height.max(bottom);
        bottom
    }

    /// Trapezoid centred on `x` from the parent's level down to `bottom`.
    fn vertical(&mut self, x: f64, top: f64, bottom: f64, r_top: f64, r_bottom: f64) -> Result<()> {
        let top = top + self.config.vertical_spacing;
        self.write(Polygon {
            vertices: [
                (x - r_top, top),
                (x - r_bottom, bottom),
                (x + r_bottom, bottom),
                (x + r_top, top),
            ],
            kind: PolygonKind::Vertical,
        })
    }

    /// Connector from the parent's centre to the child's at the parent's level.
    fn horizontal(&mut self, from_x: f64, to_x: f64, level: f64) -> Result<()> {
        let y = level + self.config.vertical_spacing;
        let thickness = self.config.connector_thickness;
        self.write(Polygon {
            vertices: [
                (from_x, y),
                (to_x, y),
                (to_x, y - thickness),
                (from_x, y - thickness),
            ],
            kind: PolygonKind::Horizontal,
        })
    }

    fn write(&mut self, polygon: Polygon) -> Result<()> {
        let expected = self.buffer.len();
        let slot = self
            .buffer
            .get_mut(self.cursor)
            .ok_or(MorphError::BufferMismatch {
                expected,
                actual: self.cursor + 1,
            })?;
        *slot = polygon;
        self.cursor += 1;
        Ok(())
    }
}

//! Dendrogram layout of neurite trees.
//!
//! Every segment becomes a vertical trapezoid whose height is the segment
//! length and whose top and bottom widths follow the radii at both ends.
//! Children of a branch node are spread horizontally in proportion to
//! their number of leaves and joined to the parent by horizontal
//! connectors.

use std::ops::Range;

use log::debug;

use crate::error::{MorphError, Result};
use crate::morphology::{Neurite, NeuriteType, Neuron};

mod builder;

use builder::LayoutContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    /// Body of one segment.
    Vertical,
    /// Connector from a branch point to one of its children.
    Horizontal,
}

/// Closed 4-vertex shape in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub vertices: [(f64, f64); 4],
    pub kind: PolygonKind,
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            vertices: [(0.0, 0.0); 4],
            kind: PolygonKind::Vertical,
        }
    }
}

impl Polygon {
    /// `(min_x, max_x)` over the four vertices.
    pub fn x_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
                (lo.min(*x), hi.max(*x))
            })
    }

    /// `(min_y, max_y)` over the four vertices.
    pub fn y_range(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
                (lo.min(*y), hi.max(*y))
            })
    }
}

/// Largest horizontal and vertical span used by one neurite's drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Placement parameters for [`Dendrogram::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct DendrogramConfig {
    /// Horizontal room given to every leaf.
    pub horizontal_spacing: f64,
    /// Gap added on both sides of every segment along y.
    pub vertical_spacing: f64,
    /// Factor applied to every radius.
    pub scale: f64,
    /// Thickness of the branch connectors; zero draws a flat line.
    pub connector_thickness: f64,
}

impl Default for DendrogramConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 40.0,
            vertical_spacing: 0.0,
            scale: 1.0,
            connector_thickness: 0.0,
        }
    }
}

impl DendrogramConfig {
    pub fn with_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_connector_thickness(mut self, thickness: f64) -> Self {
        self.connector_thickness = thickness;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.horizontal_spacing.is_finite() && self.horizontal_spacing > 0.0) {
            return Err(MorphError::InvalidSpacing(self.horizontal_spacing));
        }
        if !self.vertical_spacing.is_finite() {
            return Err(MorphError::InvalidSpacing(self.vertical_spacing));
        }
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(MorphError::InvalidScale(self.scale));
        }
        if !self.connector_thickness.is_finite() {
            return Err(MorphError::InvalidSpacing(self.connector_thickness));
        }
        Ok(())
    }
}

/// What to lay out: one neurite, or every neurite of a cell.
#[derive(Debug, Clone, Copy)]
pub enum LayoutInput<'a> {
    Neurite(&'a Neurite),
    Neuron(&'a Neuron),
}

impl<'a> LayoutInput<'a> {
    pub fn neurites(&self) -> &'a [Neurite] {
        match *self {
            LayoutInput::Neurite(neurite) => std::slice::from_ref(neurite),
            LayoutInput::Neuron(neuron) => &neuron.neurites,
        }
    }
}

impl<'a> From<&'a Neurite> for LayoutInput<'a> {
    fn from(neurite: &'a Neurite) -> Self {
        LayoutInput::Neurite(neurite)
    }
}

impl<'a> From<&'a Neuron> for LayoutInput<'a> {
    fn from(neuron: &'a Neuron) -> Self {
        LayoutInput::Neuron(neuron)
    }
}

/// Exact number of polygons the layout emits for `input`.
///
/// One polygon per segment plus one connector for every child whose
/// centre is offset from its parent's. For strictly bifurcating trees the
/// connector count is twice the number of bifurcations.
pub fn polygon_count<'a>(input: impl Into<LayoutInput<'a>>) -> usize {
    input
        .into()
        .neurites()
        .iter()
        .map(neurite_polygon_count)
        .sum()
}

fn neurite_polygon_count(neurite: &Neurite) -> usize {
    let terminations = neurite.termination_counts();
    let connectors: usize = neurite
        .nodes()
        .iter()
        .filter(|node| !node.is_leaf())
        .map(|node| {
            let weights = node.children().iter().map(|&c| terminations[c]);
            builder::connector_flags(terminations[node.id()], weights)
                .filter(|&offset| offset)
                .count()
        })
        .sum();
    neurite.segment_count() + connectors
}

/// Translate every vertex of `polygons` by `offset`.
pub fn displace(polygons: &mut [Polygon], offset: (f64, f64)) {
    for polygon in polygons.iter_mut() {
        for vertex in polygon.vertices.iter_mut() {
            vertex.0 += offset.0;
            vertex.1 += offset.1;
        }
    }
}

/// Polygons of one neurite inside the shared buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuriteLayout {
    pub neurite_type: NeuriteType,
    pub range: Range<usize>,
    pub extent: Extent,
}

/// Laid-out drawing of a neurite or of a whole neuron.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    polygons: Vec<Polygon>,
    groups: Vec<NeuriteLayout>,
}

impl Dendrogram {
    /// Lay out `input` with explicit spacings and default scale.
    pub fn generate_with_spacing<'a>(
        input: impl Into<LayoutInput<'a>>,
        horizontal_spacing: f64,
        vertical_spacing: f64,
    ) -> Result<Self> {
        let config = DendrogramConfig::default().with_spacing(horizontal_spacing, vertical_spacing);
        Self::generate(input, &config)
    }

    /// Lay out every neurite of `input` starting from the origin.
    ///
    /// The buffer is sized once from [`polygon_count`] and filled in place;
    /// each neurite occupies a contiguous slice with its own extent. No
    /// displacement between neurites is applied here.
    pub fn generate<'a>(input: impl Into<LayoutInput<'a>>, config: &DendrogramConfig) -> Result<Self> {
        config.validate()?;
        let input = input.into();
        let neurites = input.neurites();

        let total = polygon_count(input);
        debug!("dendrogram: {} neurites, {} polygons", neurites.len(), total);

        let mut polygons = vec![Polygon::default(); total];
        let mut groups = Vec::with_capacity(neurites.len());
        let mut cursor = 0usize;

        for neurite in neurites {
            let mut context = LayoutContext::new(config, &mut polygons, cursor);
            context.lay_out(neurite)?;
            let (next, extent) = context.finish();
            debug!(
                "{} laid out into polygons {}..{} with extent {:.2} x {:.2}",
                neurite.neurite_type(),
                cursor,
                next,
                extent.width,
                extent.height
            );
            groups.push(NeuriteLayout {
                neurite_type: neurite.neurite_type(),
                range: cursor..next,
                extent,
            });
            cursor = next;
        }

        if cursor != total {
            return Err(MorphError::BufferMismatch {
                expected: total,
                actual: cursor,
            });
        }

        Ok(Self { polygons, groups })
    }

    /// All polygons, neurite after neurite.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn groups(&self) -> &[NeuriteLayout] {
        &self.groups
    }

    pub fn group_polygons(&self, index: usize) -> Option<&[Polygon]> {
        self.groups
            .get(index)
            .map(|group| &self.polygons[group.range.clone()])
    }

    pub fn extents(&self) -> impl Iterator<Item = Extent> + '_ {
        self.groups.iter().map(|group| group.extent)
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

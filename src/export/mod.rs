//! Turns a laid-out dendrogram into a drawable scene.
//!
//! Neurites are placed side by side: each drawing starts where the previous
//! one's extent ends, both being centred on their own root. Colours are
//! fixed per neurite type and the legend lists each type once.

use log::debug;

use crate::dendrogram::{displace, Dendrogram, Polygon};
use crate::morphology::NeuriteType;

pub mod svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Default colour of each neurite type.
pub fn neurite_color(neurite_type: NeuriteType) -> Rgb {
    match neurite_type {
        NeuriteType::Axon => Rgb(0, 0, 255),
        NeuriteType::BasalDendrite => Rgb(255, 0, 0),
        NeuriteType::ApicalDendrite => Rgb(128, 0, 128),
        NeuriteType::Undefined => Rgb(0, 128, 0),
    }
}

/// Displaced polygons of one neurite.
#[derive(Debug, Clone)]
pub struct SceneLayer {
    pub neurite_type: NeuriteType,
    pub color: Rgb,
    pub offset: f64,
    pub polygons: Vec<Polygon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Axis-aligned box around everything in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub layers: Vec<SceneLayer>,
    pub legend: Vec<LegendEntry>,
}

impl Scene {
    /// Copy every neurite group out of `dendrogram` and move it into place.
    pub fn from_dendrogram(dendrogram: &Dendrogram) -> Self {
        let mut layers = Vec::with_capacity(dendrogram.groups().len());
        let mut legend: Vec<LegendEntry> = Vec::new();
        let mut displacement = 0.0;

        for (index, group) in dendrogram.groups().iter().enumerate() {
            if index > 0 {
                let previous = dendrogram.groups()[index - 1].extent.width;
                displacement += 0.5 * (previous + group.extent.width);
            }

            let mut polygons = dendrogram.polygons()[group.range.clone()].to_vec();
            displace(&mut polygons, (displacement, 0.0));

            let color = neurite_color(group.neurite_type);
            let label = group.neurite_type.to_string();
            if !legend.iter().any(|entry| entry.label == label) {
                legend.push(LegendEntry { label, color });
            }

            debug!(
                "layer {} ({}) displaced by {:.2}",
                index, group.neurite_type, displacement
            );
            layers.push(SceneLayer {
                neurite_type: group.neurite_type,
                color,
                offset: displacement,
                polygons,
            });
        }

        Self { layers, legend }
    }

    /// Bounds of every vertex, or `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut vertices = self
            .layers
            .iter()
            .flat_map(|layer| layer.polygons.iter())
            .flat_map(|polygon| polygon.vertices.iter());

        let &(x, y) = vertices.next()?;
        let mut bounds = Bounds {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        };
        for &(x, y) in vertices {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        }
        Some(bounds)
    }
}

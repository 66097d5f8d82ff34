use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use svg::node::element::{Group, Polygon as SvgPolygon, Rectangle, Text};
use svg::Document;

use super::{Bounds, Scene};

/// Page settings for [`export_svg`].
#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub width: f32,
    pub height: f32,
    pub title: Option<String>,
    pub legend: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            title: Some("Morphology Dendrogram".to_string()),
            legend: true,
        }
    }
}

/// Maps scene coordinates onto the page, root level at the bottom.
struct PageTransform {
    bounds: Bounds,
    margin_x: f32,
    margin_y: f32,
    scale_x: f32,
    scale_y: f32,
}

impl PageTransform {
    fn new(bounds: Bounds, options: &SvgOptions) -> Self {
        let margin_x = (options.width * 0.05).clamp(20.0, 60.0);
        let margin_y = (options.height * 0.05).clamp(20.0, 40.0);
        let inner_width = (options.width - 2.0 * margin_x).max(1.0);
        let inner_height = (options.height - 2.0 * margin_y).max(1.0);

        let width = bounds.width() as f32;
        let height = bounds.height() as f32;
        let scale_x = if width <= f32::EPSILON {
            inner_width
        } else {
            inner_width / width
        };
        let scale_y = if height <= f32::EPSILON {
            inner_height
        } else {
            inner_height / height
        };

        Self {
            bounds,
            margin_x,
            margin_y,
            scale_x,
            scale_y,
        }
    }

    fn map(&self, (x, y): (f64, f64)) -> (f32, f32) {
        let px = self.margin_x + (x - self.bounds.min_x) as f32 * self.scale_x;
        let py = self.margin_y + (self.bounds.max_y - y) as f32 * self.scale_y;
        (px, py)
    }
}

/// Build the SVG document for `scene`.
pub fn render_document(scene: &Scene, options: &SvgOptions) -> Document {
    let mut document = Document::new()
        .set("width", options.width)
        .set("height", options.height)
        .set(
            "viewBox",
            (0, 0, options.width as i32, options.height as i32),
        );

    let background = Rectangle::new()
        .set("width", "100%")
        .set("height", "100%")
        .set("fill", "white");
    document = document.add(background);

    if let Some(bounds) = scene.bounds() {
        let transform = PageTransform::new(bounds, options);
        let mut dendrogram_group = Group::new().set("id", "dendrogram");

        for (index, layer) in scene.layers.iter().enumerate() {
            let color = layer.color.to_hex();
            let mut layer_group = Group::new()
                .set("id", format!("neurite-{index}"))
                .set("fill", color.clone())
                .set("stroke", color);

            for polygon in &layer.polygons {
                let points = polygon
                    .vertices
                    .iter()
                    .map(|&vertex| {
                        let (x, y) = transform.map(vertex);
                        format!("{},{}", x, y)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                layer_group = layer_group.add(SvgPolygon::new().set("points", points));
            }
            dendrogram_group = dendrogram_group.add(layer_group);
        }
        document = document.add(dendrogram_group);
    }

    if let Some(title) = &options.title {
        let title_text = Text::new("")
            .set("x", options.width * 0.5)
            .set("y", 18.0)
            .set("font-size", 14.0)
            .set("text-anchor", "middle")
            .add(svg::node::Text::new(title.clone()));
        document = document.add(title_text);
    }

    if options.legend && !scene.legend.is_empty() {
        let mut legend_group = Group::new().set("id", "legend");
        let x = options.width - 150.0;
        for (row, entry) in scene.legend.iter().enumerate() {
            let y = 30.0 + row as f32 * 16.0;
            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y - 8.0)
                .set("width", 12.0)
                .set("height", 8.0)
                .set("fill", entry.color.to_hex());
            let label = Text::new("")
                .set("x", x + 18.0)
                .set("y", y)
                .set("font-size", 11.0)
                .set("text-anchor", "start")
                .add(svg::node::Text::new(entry.label.clone()));
            legend_group = legend_group.add(swatch).add(label);
        }
        document = document.add(legend_group);
    }

    document
}

/// Render `scene` and write it to `path`.
pub fn export_svg(scene: &Scene, path: &Path, options: &SvgOptions) -> Result<()> {
    let document = render_document(scene, options);
    svg::save(path, &document)
        .with_context(|| format!("failed to write SVG: {}", path.display()))?;
    info!(
        "Wrote dendrogram with {} neurites to {}",
        scene.layers.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dendrogram::{Dendrogram, DendrogramConfig};
    use crate::morphology::test_support::fork;
    use crate::morphology::Neuron;

    fn scene() -> Scene {
        let neuron = Neuron::new(None, Vec::new(), vec![fork(), fork()]);
        let dendrogram = Dendrogram::generate(&neuron, &DendrogramConfig::default()).unwrap();
        Scene::from_dendrogram(&dendrogram)
    }

    #[test]
    fn document_contains_polygons_title_and_legend() {
        let rendered = render_document(&scene(), &SvgOptions::default()).to_string();
        assert_eq!(rendered.matches("<polygon").count(), 8);
        assert!(rendered.contains("Morphology Dendrogram"));
        assert!(rendered.contains("Basal dendrite"));
        assert!(rendered.contains("#ff0000"));
    }

    #[test]
    fn legend_and_title_can_be_hidden() {
        let options = SvgOptions {
            title: None,
            legend: false,
            ..SvgOptions::default()
        };
        let rendered = render_document(&scene(), &options).to_string();
        assert!(!rendered.contains("Morphology Dendrogram"));
        assert!(!rendered.contains("id=\"legend\""));
    }

    #[test]
    fn transform_puts_root_level_at_the_bottom() {
        let bounds = Bounds {
            min_x: -10.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 5.0,
        };
        let options = SvgOptions {
            width: 240.0,
            height: 140.0,
            ..SvgOptions::default()
        };
        let transform = PageTransform::new(bounds, &options);
        assert_eq!(transform.map((-10.0, 0.0)), (20.0, 120.0));
        assert_eq!(transform.map((10.0, 5.0)), (220.0, 20.0));
    }

    #[test]
    fn writes_file_to_disk() {
        let path = std::env::temp_dir().join(format!("neurodendro-{}.svg", std::process::id()));
        export_svg(&scene(), &path, &SvgOptions::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
        assert_eq!(written.matches("<polygon").count(), 8);
        let _ = std::fs::remove_file(&path);
    }
}

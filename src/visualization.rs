//! Visualization utilities for spanning trees and tours.
//!
//! Generates SVG drawings of an instance with its MST edges and an
//! optional tour overlay, plus plain-text exports for external plotting.

use crate::instance::MSTInstance;
use crate::mst::SpanningTree;
use crate::tour::Tour;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Point radius
    pub point_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            point_radius: 8.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an SVG drawing of the tree, with the tour drawn in red on
    /// top when given.
    pub fn generate_svg(
        &self,
        instance: &MSTInstance,
        tree: &SpanningTree,
        tour: Option<&Tour>,
    ) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .point {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .root {{ fill: #2ecc71; stroke: #27ae60; stroke-width: 2; }}
    .tree-edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .tour-edge {{ stroke: #e74c3c; stroke-width: 1.5; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        let mut title = format!(
            "Instance: {} | MST height: {:.2} | MST weight: {:.2}",
            instance.name, tree.height, tree.total_weight
        );
        if let Some(tour) = tour {
            title.push_str(&format!(" | Tour weight: {:.2}", tour.weight));
        }
        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{}</text>
"##,
            self.margin, title
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        for (p, v, _) in tree.edges() {
            let from = &instance.points[tree.order[p]];
            let to = &instance.points[tree.order[v]];

            let (x1, y1) = transform(from.x, from.y);
            let (x2, y2) = transform(to.x, to.y);

            svg.push_str(&format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="tree-edge"/>
"#,
                x1, y1, x2, y2
            ));
        }

        if let Some(tour) = tour {
            for pair in tour.sequence.windows(2) {
                let from = &instance.points[pair[0]];
                let to = &instance.points[pair[1]];

                let (x1, y1) = transform(from.x, from.y);
                let (x2, y2) = transform(to.x, to.y);

                svg.push_str(&format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="tour-edge"/>
"#,
                    x1, y1, x2, y2
                ));
            }
        }

        let root = tree.order.first().copied();
        for (idx, point) in instance.points.iter().enumerate() {
            let (x, y) = transform(point.x, point.y);

            let class = if root == Some(idx) { "root" } else { "point" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.point_radius, class
            ));

            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x, y - self.point_radius - 3.0, point.id
            ));
        }

        let legend_y = self.height - 30.0;
        svg.push_str(&format!(r##"
<rect x="{}" y="{}" width="15" height="15" class="root"/>
<text x="{}" y="{}" class="label">Root</text>
<rect x="{}" y="{}" width="15" height="15" class="point"/>
<text x="{}" y="{}" class="label">Point</text>
<line x1="{}" y1="{}" x2="{}" y2="{}" class="tree-edge"/>
<text x="{}" y="{}" class="label">MST</text>
<line x1="{}" y1="{}" x2="{}" y2="{}" class="tour-edge"/>
<text x="{}" y="{}" class="label">Tour</text>
"##,
            self.margin, legend_y, self.margin + 20.0, legend_y + 12.0,
            self.margin + 80.0, legend_y, self.margin + 100.0, legend_y + 12.0,
            self.margin + 160.0, legend_y + 8.0, self.margin + 175.0, legend_y + 8.0,
            self.margin + 180.0, legend_y + 12.0,
            self.margin + 230.0, legend_y + 8.0, self.margin + 245.0, legend_y + 8.0,
            self.margin + 250.0, legend_y + 12.0
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &MSTInstance) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for point in &instance.points {
            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
            min_y = min_y.min(point.y);
            max_y = max_y.max(point.y);
        }

        (min_x, max_x, min_y, max_y)
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(
        &self,
        instance: &MSTInstance,
        tree: &SpanningTree,
        tour: Option<&Tour>,
    ) -> String {
        let mut data = String::new();

        data.push_str("# MST Data\n");
        data.push_str(&format!("# Instance: {}\n", instance.name));
        data.push_str(&format!("# Height: {:.4}\n", tree.height));
        data.push_str(&format!("# Total weight: {:.4}\n\n", tree.total_weight));

        data.push_str("# Points: id, x, y\n");
        for point in &instance.points {
            data.push_str(&format!("{},{},{}\n", point.id, point.x, point.y));
        }

        data.push_str("\n# Tree edges: from id, to id, weight\n");
        for (p, v, w) in tree.edges() {
            data.push_str(&format!(
                "{},{},{:.4}\n",
                instance.points[tree.order[p]].id,
                instance.points[tree.order[v]].id,
                w
            ));
        }

        if let Some(tour) = tour {
            data.push_str("\n# Tour: sequence of point ids\n");
            let tour_str: Vec<String> = tour.sequence.iter().map(|n| n.to_string()).collect();
            data.push_str(&tour_str.join(","));
            data.push('\n');
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Metric, Point};

    fn create_test_instance() -> MSTInstance {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 0.0, 1.0),
        ];
        MSTInstance::from_points("test".to_string(), points, Metric::Euclidean)
    }

    #[test]
    fn test_visualizer() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[0, 1, 2]);

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &tree, None);

        assert!(svg.contains("svg"));
        assert!(svg.contains("test"));
        assert!(svg.contains("tree-edge"));
    }

    #[test]
    fn test_tour_overlay() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[0, 1, 2]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &tree, Some(&tour));

        assert!(svg.contains("Tour weight"));
        assert!(svg.matches("tour-edge").count() > tour.sequence.len() - 1);
    }

    #[test]
    fn test_export_plot_data() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[0, 1, 2]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        let viz = Visualizer::new();
        let data = viz.export_plot_data(&instance, &tree, Some(&tour));

        assert!(data.contains("# Points"));
        assert!(data.contains("# Tree edges"));
        assert!(data.contains("0,1,2,0"));
    }
}

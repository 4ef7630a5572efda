//! Module for parsing and representing 2D point instances.
//!
//! Instances are plain text files with one `id x y` line per point
//! (1-indexed ids in files, 0-indexed internally). All pairwise distances
//! are Euclidean and precomputed once per instance; they can optionally be
//! rounded to the nearest integer to reproduce integer-weight data sets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Represents a point of the instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    /// Point identifier (1-indexed in files, 0-indexed internally)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Point { id, x, y }
    }
}

/// Edge weight metric choices
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Metric {
    /// Exact Euclidean distance
    Euclidean,
    /// Euclidean distance rounded to the nearest integer
    RoundedEuclidean,
}

/// Represents a complete point-set instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MSTInstance {
    /// Name of the instance
    pub name: String,
    /// Number of points
    pub dimension: usize,
    /// List of all points
    pub points: Vec<Point>,
    /// Precomputed distance matrix
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<f64>>,
    /// Selected metric for edge weights
    pub metric: Metric,
}

impl MSTInstance {
    /// Parse an instance from a plain text file with one `id x y` line per
    /// point. Blank lines and lines starting with `#` are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        Self::from_file_with_metric(path, Metric::Euclidean)
    }

    /// Parse an instance file and attach the given metric.
    pub fn from_file_with_metric<P: AsRef<Path>>(path: P, metric: Metric) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut points: Vec<Point> = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(format!("Malformed point line: '{}'", line));
            }
            let id: usize = parts[0].parse().map_err(|_| "Invalid point id")?;
            let x: f64 = parts[1].parse().map_err(|_| "Invalid x coordinate")?;
            let y: f64 = parts[2].parse().map_err(|_| "Invalid y coordinate")?;
            if id == 0 {
                return Err("Point ids in files are 1-indexed".to_string());
            }
            points.push(Point::new(id - 1, x, y));
        }

        if points.is_empty() {
            return Err("Instance file contains no points".to_string());
        }

        let name = path.as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("instance")
            .to_string();

        Ok(Self::from_points(name, points, metric))
    }

    /// Build an instance from an in-memory point list.
    pub fn from_points(name: String, points: Vec<Point>, metric: Metric) -> Self {
        let distance_matrix = Self::compute_distance_matrix(&points, metric);

        MSTInstance {
            name,
            dimension: points.len(),
            points,
            distance_matrix,
            metric,
        }
    }

    /// Compute the pairwise distance matrix under the selected metric
    fn compute_distance_matrix(points: &[Point], metric: Metric) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = points[i].x - points[j].x;
                    let dy = points[i].y - points[j].y;
                    let d = (dx * dx + dy * dy).sqrt();
                    matrix[i][j] = match metric {
                        Metric::Euclidean => d,
                        Metric::RoundedEuclidean => d.round(),
                    };
                }
            }
        }

        matrix
    }

    /// Get the distance between two points
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Total weight of a vertex sequence, summed over consecutive pairs.
    /// The sequence is taken as-is: a closed tour must already contain the
    /// returning vertex at the end.
    pub fn tour_weight(&self, sequence: &[usize]) -> f64 {
        if sequence.len() < 2 {
            return 0.0;
        }

        let mut weight = 0.0;
        for i in 0..sequence.len() - 1 {
            weight += self.distance(sequence[i], sequence[i + 1]);
        }

        weight
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                distances.push(self.distance(i, j));
            }
        }

        let (avg_distance, min_distance, max_distance) = if distances.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let avg = distances.iter().sum::<f64>() / distances.len() as f64;
            let min = distances.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = distances.iter().cloned().fold(0.0, f64::max);
            (avg, min, max)
        };

        let min_x = self.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = self.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            metric: self.metric,
            avg_distance,
            min_distance,
            max_distance,
            width: if self.dimension == 0 { 0.0 } else { max_x - min_x },
            height: if self.dimension == 0 { 0.0 } else { max_y - min_y },
        }
    }
}

/// Statistics about a point-set instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub width: f64,
    pub height: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Points: {}", self.dimension)?;
        writeln!(f, "  Metric: {:?}", self.metric)?;
        writeln!(f, "  Min distance: {:.4}", self.min_distance)?;
        writeln!(f, "  Avg distance: {:.4}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.4}", self.max_distance)?;
        writeln!(f, "  Bounding box: {:.1} x {:.1}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_points(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i, i as f64, i as f64)).collect()
    }

    #[test]
    fn test_distance_calculation() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 3.0, 4.0),
        ];
        let matrix = MSTInstance::compute_distance_matrix(&points, Metric::Euclidean);

        assert!((matrix[0][1] - 5.0).abs() < 1e-10);
        assert!((matrix[1][0] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_matrix_symmetry_and_diagonal() {
        let instance = MSTInstance::from_points(
            "diag".to_string(),
            diagonal_points(5),
            Metric::Euclidean,
        );

        for i in 0..5 {
            assert_eq!(instance.distance(i, i), 0.0);
            for j in 0..5 {
                assert!((instance.distance(i, j) - instance.distance(j, i)).abs() < 1e-10);
            }
        }
        assert!((instance.distance(0, 1) - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_rounded_metric() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 1.0),
        ];
        let instance = MSTInstance::from_points(
            "rounded".to_string(),
            points,
            Metric::RoundedEuclidean,
        );

        // sqrt(2) rounds down to 1
        assert_eq!(instance.distance(0, 1), 1.0);
    }

    #[test]
    fn test_tour_weight() {
        let instance = MSTInstance::from_points(
            "diag".to_string(),
            diagonal_points(3),
            Metric::Euclidean,
        );

        let weight = instance.tour_weight(&[0, 1, 2, 0]);
        assert!((weight - 4.0 * 2.0_f64.sqrt()).abs() < 1e-10);
        assert_eq!(instance.tour_weight(&[0]), 0.0);
    }

    #[test]
    fn test_statistics() {
        let instance = MSTInstance::from_points(
            "diag".to_string(),
            diagonal_points(5),
            Metric::Euclidean,
        );
        let stats = instance.statistics();

        assert_eq!(stats.dimension, 5);
        assert!((stats.min_distance - 2.0_f64.sqrt()).abs() < 1e-10);
        assert!((stats.max_distance - 4.0 * 2.0_f64.sqrt()).abs() < 1e-10);
        assert!((stats.width - 4.0).abs() < 1e-10);
    }
}

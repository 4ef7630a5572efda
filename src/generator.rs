//! Random instance generation.
//!
//! Produces uniform random integer-coordinate point sets and writes them
//! in the plain `id x y` instance format.

use crate::instance::{MSTInstance, Metric, Point};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generator for uniform random point-set instances
pub struct InstanceGenerator {
    /// Number of points
    pub num_points: usize,
    /// Coordinates are drawn from [0, max_coord]
    pub max_coord: i64,
    /// Random seed
    pub seed: u64,
}

impl InstanceGenerator {
    pub fn new(num_points: usize, max_coord: i64, seed: u64) -> Self {
        InstanceGenerator {
            num_points,
            max_coord,
            seed,
        }
    }

    /// Generate an instance with integer coordinates
    pub fn generate(&self, name: &str, metric: Metric) -> MSTInstance {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let points = (0..self.num_points)
            .map(|i| {
                let x = rng.gen_range(0..=self.max_coord) as f64;
                let y = rng.gen_range(0..=self.max_coord) as f64;
                Point::new(i, x, y)
            })
            .collect();

        MSTInstance::from_points(name.to_string(), points, metric)
    }
}

/// Write an instance in the plain `id x y` format (ids are 1-indexed on disk)
pub fn write_instance_file<P: AsRef<Path>>(
    instance: &MSTInstance,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for point in &instance.points {
        writeln!(file, "{} {} {}", point.id + 1, point.x, point.y)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let generator = InstanceGenerator::new(12, 100, 7);
        let a = generator.generate("a", Metric::Euclidean);
        let b = generator.generate("b", Metric::Euclidean);

        assert_eq!(a.dimension, 12);
        for (pa, pb) in a.points.iter().zip(&b.points) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
        }
    }

    #[test]
    fn test_seeds_give_different_instances() {
        let draws: Vec<MSTInstance> = (0..5)
            .map(|seed| InstanceGenerator::new(10, 1000, seed).generate("g", Metric::Euclidean))
            .collect();

        let coords = |instance: &MSTInstance| {
            instance
                .points
                .iter()
                .map(|p| (p.x as i64, p.y as i64))
                .collect::<Vec<_>>()
        };
        assert!(draws.iter().any(|d| coords(d) != coords(&draws[0])));
    }

    #[test]
    fn test_coordinates_in_bounds() {
        let instance = InstanceGenerator::new(50, 25, 3).generate("b", Metric::Euclidean);
        for point in &instance.points {
            assert!(point.x >= 0.0 && point.x <= 25.0);
            assert!(point.y >= 0.0 && point.y <= 25.0);
            assert_eq!(point.x, point.x.trunc());
        }
    }

    #[test]
    fn test_file_round_trip() {
        let instance = InstanceGenerator::new(8, 500, 11).generate("roundtrip", Metric::Euclidean);
        let path = std::env::temp_dir().join("mst_generator_roundtrip.txt");

        write_instance_file(&instance, &path).unwrap();
        let loaded = MSTInstance::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.dimension, instance.dimension);
        for (a, b) in instance.points.iter().zip(&loaded.points) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
        }
    }
}

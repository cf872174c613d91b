use std::f64::consts::PI;

use super::{Distribution, Family, SamplePoint};

pub const NORMAL_POINTS: usize = 100;

/// Gaussian density sampled on mean ± 4σ.
#[derive(Debug, Clone, Copy)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
    points: usize,
}

impl Normal {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            points: NORMAL_POINTS,
        }
    }

    /// Override the sample count. At least two points are always produced.
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points.max(2);
        self
    }

    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        (1.0 / (self.std_dev * (2.0 * PI).sqrt())) * (-0.5 * z * z).exp()
    }
}

impl Distribution for Normal {
    fn family(&self) -> Family {
        Family::Normal
    }

    fn samples(&self) -> Vec<SamplePoint> {
        let range = 4.0 * self.std_dev;
        let last = (self.points - 1) as f64;
        (0..self.points)
            .map(|i| {
                let x = self.mean - range + (i as f64 / last) * range * 2.0;
                SamplePoint::new(x, self.pdf(x))
            })
            .collect()
    }

    fn info(&self) -> String {
        format!("Normal(mean={}, std_dev={})", self.mean, self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_shape() {
        for (mean, std_dev) in [(0.0, 1.0), (-2.5, 0.3), (4.0, 3.0)] {
            let points = Normal::new(mean, std_dev).samples();
            assert_eq!(points.len(), 100);
            assert!((points[0].x - (mean - 4.0 * std_dev)).abs() < 1e-9);
            assert!((points[99].x - (mean + 4.0 * std_dev)).abs() < 1e-9);
            assert!(points.windows(2).all(|w| w[0].x < w[1].x));
            // rising up to the centre, falling after it
            assert!(points[..50].windows(2).all(|w| w[0].y < w[1].y));
            assert!(points[49..].windows(2).skip(1).all(|w| w[0].y > w[1].y));
        }
    }

    #[test]
    fn test_standard_normal_values() {
        let points = Normal::new(0.0, 1.0).samples();
        assert!((points[0].x + 4.0).abs() < 1e-12);
        assert!((points[0].y - 0.0001338).abs() < 1e-6);

        let (peak, _) = points
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.y.total_cmp(&b.1.y))
            .unwrap();
        assert!(peak == 49 || peak == 50);
        assert!((points[peak].y - 0.3989).abs() < 1e-3);
    }

    #[test]
    fn test_with_points() {
        assert_eq!(Normal::new(0.0, 1.0).with_points(9).samples().len(), 9);
        let two = Normal::new(1.0, 0.5).with_points(0).samples();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].x, -1.0);
        assert_eq!(two[1].x, 3.0);
    }

    #[test]
    fn test_riemann_mass() {
        // trapezoid over ±4σ holds all but ~6e-5 of the mass
        let points = Normal::new(1.0, 2.0).with_points(2001).samples();
        let mass: f64 = points
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
            .sum();
        assert!((mass - 1.0).abs() < 1e-3);
    }
}

use super::{Distribution, Family, SamplePoint};

pub const DEFAULT_MAX_K: u32 = 20;

/// Poisson mass function truncated to k = 0..=max_k.
#[derive(Debug, Clone, Copy)]
pub struct Poisson {
    lambda: f64,
    max_k: u32,
}

impl Poisson {
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda,
            max_k: DEFAULT_MAX_K,
        }
    }

    pub fn with_max_k(mut self, max_k: u32) -> Self {
        self.max_k = max_k;
        self
    }

    pub fn pmf(&self, k: u32) -> f64 {
        let mut factorial = 1.0;
        for i in 2..=k {
            factorial *= i as f64;
        }
        self.lambda.powi(k as i32) * (-self.lambda).exp() / factorial
    }
}

impl Distribution for Poisson {
    fn family(&self) -> Family {
        Family::Poisson
    }

    fn samples(&self) -> Vec<SamplePoint> {
        (0..=self.max_k)
            .map(|k| SamplePoint::new(k as f64, self.pmf(k)))
            .collect()
    }

    fn info(&self) -> String {
        format!("Poisson(lambda={}, max_k={})", self.lambda, self.max_k)
    }
}

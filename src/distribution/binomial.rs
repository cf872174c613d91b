use super::{Distribution, Family, SamplePoint};

/// Binomial mass function over k = 0..=n.
#[derive(Debug, Clone, Copy)]
pub struct Binomial {
    n: u32,
    p: f64,
}

impl Binomial {
    pub fn new(n: u32, p: f64) -> Self {
        Self { n, p }
    }

    /// n choose k by running product, exact enough for n <= 50.
    fn coefficient(n: u32, k: u32) -> f64 {
        let mut coeff = 1.0;
        for i in (n - k + 1)..=n {
            coeff *= i as f64;
        }
        for i in 1..=k {
            coeff /= i as f64;
        }
        coeff
    }

    pub fn pmf(&self, k: u32) -> f64 {
        if k > self.n {
            return 0.0;
        }
        // powi keeps 0^0 == 1 at the p = 0 / p = 1 edges
        Self::coefficient(self.n, k)
            * self.p.powi(k as i32)
            * (1.0 - self.p).powi((self.n - k) as i32)
    }
}

impl Distribution for Binomial {
    fn family(&self) -> Family {
        Family::Binomial
    }

    fn samples(&self) -> Vec<SamplePoint> {
        (0..=self.n)
            .map(|k| SamplePoint::new(k as f64, self.pmf(k)))
            .collect()
    }

    fn info(&self) -> String {
        format!("Binomial(n={}, p={})", self.n, self.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_binomial_support_and_mass() {
        for n in [1, 7, 20, 50] {
            for p in [0.0, 0.01, 0.3, 0.5, 0.99, 1.0] {
                let points = Binomial::new(n, p).samples();
                assert_eq!(points.len(), n as usize + 1);
                for (k, point) in points.iter().enumerate() {
                    assert_eq!(point.x, k as f64);
                    assert!(point.y >= 0.0);
                }
                let mass: f64 = points.iter().map(|p| p.y).sum();
                assert!((mass - 1.0).abs() < 1e-9, "n={n} p={p} mass={mass}");
            }
        }
    }

    #[test]
    fn test_binomial_zero_trials() {
        let points = Binomial::new(0, 0.37).samples();
        assert_eq!(points, vec![SamplePoint::new(0.0, 1.0)]);
    }

    #[test]
    fn test_binomial_coefficients() {
        assert_eq!(Binomial::coefficient(5, 2), 10.0);
        assert_eq!(Binomial::coefficient(20, 10), 184_756.0);
        let exact = 126_410_606_437_752.0;
        assert!((Binomial::coefficient(50, 25) - exact).abs() / exact < 1e-12);
    }

    #[test]
    fn test_binomial_matches_sampling() {
        let (n, p) = (20, 0.3);
        let binomial = Binomial::new(n, p);
        let sampler = rand_distr::Binomial::new(n as u64, p).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let sample_len = 200_000;
        let mut counts = vec![0usize; n as usize + 1];
        for _ in 0..sample_len {
            let k = rand_distr::Distribution::sample(&sampler, &mut rng);
            counts[k as usize] += 1;
        }
        for (k, count) in counts.iter().enumerate() {
            let freq = *count as f64 / sample_len as f64;
            assert!((freq - binomial.pmf(k as u32)).abs() < 0.01);
        }
    }
}

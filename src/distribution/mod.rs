pub mod binomial;
pub mod normal;
pub mod poisson;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use binomial::Binomial;
pub use normal::Normal;
pub use poisson::Poisson;

use crate::error::VizError;

/// One (x, y) sample of a density or mass function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

impl SamplePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Normal,
    Binomial,
    Poisson,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Normal, Family::Binomial, Family::Poisson];

    /// Discrete families are drawn as bars, continuous ones as a filled curve.
    pub fn is_discrete(self) -> bool {
        matches!(self, Family::Binomial | Family::Poisson)
    }

    pub fn title(self) -> &'static str {
        match self {
            Family::Normal => "Normal Distribution",
            Family::Binomial => "Binomial Distribution",
            Family::Poisson => "Poisson Distribution",
        }
    }

    /// Successor in the autoplay rotation.
    pub fn next(self) -> Self {
        match self {
            Family::Normal => Family::Binomial,
            Family::Binomial => Family::Poisson,
            Family::Poisson => Family::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Normal => "normal",
            Family::Binomial => "binomial",
            Family::Poisson => "poisson",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "gaussian" => Ok(Family::Normal),
            "binomial" => Ok(Family::Binomial),
            "poisson" => Ok(Family::Poisson),
            _ => Err(VizError::UnknownFamily(s.to_string())),
        }
    }
}

/// A distribution shape that can be sampled into a finite point sequence.
///
/// Implementations are pure: parameters are expected to be clamped by the
/// caller, so out-of-range inputs are not rejected here.
pub trait Distribution: Send + Sync {
    fn family(&self) -> Family;

    /// Materialize the full, x-ordered sample sequence.
    fn samples(&self) -> Vec<SamplePoint>;

    fn info(&self) -> String;
}

impl Distribution for Box<dyn Distribution> {
    fn family(&self) -> Family {
        self.as_ref().family()
    }

    fn samples(&self) -> Vec<SamplePoint> {
        self.as_ref().samples()
    }

    fn info(&self) -> String {
        self.as_ref().info()
    }
}

/// Tagged union over the supported families and their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum DistributionSpec {
    Normal { mean: f64, std_dev: f64 },
    Binomial { n: u32, p: f64 },
    Poisson { lambda: f64 },
}

impl DistributionSpec {
    pub fn boxed(&self) -> Box<dyn Distribution> {
        match *self {
            DistributionSpec::Normal { mean, std_dev } => Box::new(Normal::new(mean, std_dev)),
            DistributionSpec::Binomial { n, p } => Box::new(Binomial::new(n, p)),
            DistributionSpec::Poisson { lambda } => Box::new(Poisson::new(lambda)),
        }
    }
}

impl Distribution for DistributionSpec {
    fn family(&self) -> Family {
        match self {
            DistributionSpec::Normal { .. } => Family::Normal,
            DistributionSpec::Binomial { .. } => Family::Binomial,
            DistributionSpec::Poisson { .. } => Family::Poisson,
        }
    }

    fn samples(&self) -> Vec<SamplePoint> {
        match *self {
            DistributionSpec::Normal { mean, std_dev } => Normal::new(mean, std_dev).samples(),
            DistributionSpec::Binomial { n, p } => Binomial::new(n, p).samples(),
            DistributionSpec::Poisson { lambda } => Poisson::new(lambda).samples(),
        }
    }

    fn info(&self) -> String {
        match *self {
            DistributionSpec::Normal { mean, std_dev } => Normal::new(mean, std_dev).info(),
            DistributionSpec::Binomial { n, p } => Binomial::new(n, p).info(),
            DistributionSpec::Poisson { lambda } => Poisson::new(lambda).info(),
        }
    }
}

/// Largest y across the sequence, `None` when it is empty.
pub fn max_y(points: &[SamplePoint]) -> Option<f64> {
    points.iter().map(|p| p.y).reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_rotation() {
        let mut family = Family::Normal;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(family);
            family = family.next();
        }
        assert_eq!(
            seen,
            vec![Family::Normal, Family::Binomial, Family::Poisson, Family::Normal]
        );
    }

    #[test]
    fn test_family_parse() {
        assert_eq!("Poisson".parse::<Family>().unwrap(), Family::Poisson);
        assert_eq!("normal".parse::<Family>().unwrap(), Family::Normal);
        assert!(matches!(
            "cauchy".parse::<Family>(),
            Err(VizError::UnknownFamily(name)) if name == "cauchy"
        ));
    }

    #[test]
    fn test_spec_dispatch() {
        let specs = [
            DistributionSpec::Normal { mean: 0.0, std_dev: 1.0 },
            DistributionSpec::Binomial { n: 10, p: 0.3 },
            DistributionSpec::Poisson { lambda: 2.0 },
        ];
        let lens: Vec<usize> = specs.iter().map(|s| s.samples().len()).collect();
        assert_eq!(lens, vec![100, 11, 21]);
        for spec in specs {
            assert_eq!(spec.boxed().samples(), spec.samples());
            assert_eq!(spec.boxed().family(), spec.family());
        }
    }

    #[test]
    fn test_spec_json_shape() {
        let spec = DistributionSpec::Binomial { n: 20, p: 0.5 };
        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(json, serde_json::json!({"family": "binomial", "n": 20, "p": 0.5}));
    }

    #[test]
    fn test_max_y() {
        assert_eq!(max_y(&[]), None);
        let points = [
            SamplePoint::new(0.0, 0.2),
            SamplePoint::new(1.0, 0.5),
            SamplePoint::new(2.0, 0.3),
        ];
        assert_eq!(max_y(&points), Some(0.5));
    }
}

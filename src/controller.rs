//! Per-family parameter state behind the chart.
//!
//! Values are clamped here, before they reach the distribution math, which
//! trusts its inputs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::AutoplayBounds,
    distribution::{DistributionSpec, Family},
};

/// Closed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp without panicking on NaN or an inverted span.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Slider range and step of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub span: Span,
    pub step: f64,
}

impl Bounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            span: Span::new(min, max),
            step,
        }
    }

    /// Snap `value` to the step grid anchored at `min`, then clamp.
    pub fn apply(&self, value: f64) -> f64 {
        let snapped = if self.step > 0.0 && value.is_finite() {
            let steps = ((value - self.span.min) / self.step).round();
            // strip accumulated binary fuzz, e.g. 0.2999999999999998
            ((self.span.min + steps * self.step) * 1e9).round() / 1e9
        } else {
            value
        };
        self.span.clamp(snapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    Mean,
    StdDev,
    Trials,
    SuccessProb,
    Rate,
}

impl Param {
    pub const ALL: [Param; 5] = [
        Param::Mean,
        Param::StdDev,
        Param::Trials,
        Param::SuccessProb,
        Param::Rate,
    ];

    pub fn family(self) -> Family {
        match self {
            Param::Mean | Param::StdDev => Family::Normal,
            Param::Trials | Param::SuccessProb => Family::Binomial,
            Param::Rate => Family::Poisson,
        }
    }

    /// Interactive slider bounds.
    pub fn bounds(self) -> Bounds {
        match self {
            Param::Mean => Bounds::new(-5.0, 5.0, 0.1),
            Param::StdDev => Bounds::new(0.1, 3.0, 0.1),
            Param::Trials => Bounds::new(1.0, 50.0, 1.0),
            Param::SuccessProb => Bounds::new(0.0, 1.0, 0.01),
            Param::Rate => Bounds::new(0.1, 15.0, 0.1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Param::Mean => "Mean (μ)",
            Param::StdDev => "Standard Deviation (σ)",
            Param::Trials => "Number of Trials (n)",
            Param::SuccessProb => "Success Probability (p)",
            Param::Rate => "Rate Parameter (λ)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinomialParams {
    pub n: u32,
    pub p: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoissonParams {
    pub lambda: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub normal: NormalParams,
    pub binomial: BinomialParams,
    pub poisson: PoissonParams,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            normal: NormalParams {
                mean: 0.0,
                std_dev: 1.0,
            },
            binomial: BinomialParams { n: 20, p: 0.5 },
            poisson: PoissonParams { lambda: 5.0 },
        }
    }
}

impl Parameters {
    pub fn spec(&self, family: Family) -> DistributionSpec {
        match family {
            Family::Normal => DistributionSpec::Normal {
                mean: self.normal.mean,
                std_dev: self.normal.std_dev,
            },
            Family::Binomial => DistributionSpec::Binomial {
                n: self.binomial.n,
                p: self.binomial.p,
            },
            Family::Poisson => DistributionSpec::Poisson {
                lambda: self.poisson.lambda,
            },
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Mean => self.normal.mean,
            Param::StdDev => self.normal.std_dev,
            Param::Trials => self.binomial.n as f64,
            Param::SuccessProb => self.binomial.p,
            Param::Rate => self.poisson.lambda,
        }
    }

    fn set(&mut self, param: Param, value: f64) {
        match param {
            Param::Mean => self.normal.mean = value,
            Param::StdDev => self.normal.std_dev = value,
            Param::Trials => self.binomial.n = value.round() as u32,
            Param::SuccessProb => self.binomial.p = value,
            Param::Rate => self.poisson.lambda = value,
        }
    }
}

/// Active family plus the parameters of every family.
///
/// `revision` increases on every effective change, so a caller can redraw
/// exactly when it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterController {
    active: Family,
    params: Parameters,
    revision: u64,
}

impl Default for ParameterController {
    fn default() -> Self {
        Self::new(Family::Normal)
    }
}

impl ParameterController {
    pub fn new(active: Family) -> Self {
        Self {
            active,
            params: Parameters::default(),
            revision: 0,
        }
    }

    pub fn active(&self) -> Family {
        self.active
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, param: Param) -> f64 {
        self.params.get(param)
    }

    /// Spec of the active family.
    pub fn spec(&self) -> DistributionSpec {
        self.params.spec(self.active)
    }

    /// Returns whether the selection changed.
    pub fn set_active(&mut self, family: Family) -> bool {
        if self.active == family {
            return false;
        }
        self.active = family;
        self.revision += 1;
        true
    }

    /// Slider input: clamp and snap `value`, store it, return what was stored.
    pub fn set_param(&mut self, param: Param, value: f64) -> f64 {
        let applied = param.bounds().apply(value);
        if self.params.get(param) != applied {
            self.params.set(param, applied);
            self.revision += 1;
        }
        self.params.get(param)
    }

    /// Rotate Normal -> Binomial -> Poisson -> Normal.
    pub fn advance_family(&mut self) -> Family {
        self.set_active(self.active.next());
        self.active
    }

    /// Random-walk the active family's parameters by one autoplay step.
    pub fn nudge<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: &AutoplayBounds) {
        match self.active {
            Family::Normal => {
                let normal = &mut self.params.normal;
                normal.mean = Param::Mean
                    .bounds()
                    .span
                    .clamp(normal.mean + jitter(rng, bounds.mean_step));
                normal.std_dev = bounds
                    .std_dev
                    .clamp(normal.std_dev + jitter(rng, bounds.std_dev_step));
            }
            Family::Binomial => {
                let binomial = &mut self.params.binomial;
                let delta = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                binomial.n = bounds.trials.clamp(binomial.n as f64 + delta).round() as u32;
                binomial.p = bounds
                    .success_prob
                    .clamp(binomial.p + jitter(rng, bounds.success_prob_step));
            }
            Family::Poisson => {
                let poisson = &mut self.params.poisson;
                poisson.lambda = bounds
                    .rate
                    .clamp(poisson.lambda + jitter(rng, bounds.rate_step));
            }
        }
        self.revision += 1;
    }
}

/// Uniform offset in `[-step, step)`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, step: f64) -> f64 {
    if step > 0.0 {
        rng.gen_range(-step..step)
    } else {
        0.0
    }
}

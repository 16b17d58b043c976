//! Probability distributions for cashflow values and growth rates
//!
//! Every random quantity in a scenario is described by a [`Distribution`]:
//! a small closed set of families that covers estimation practice (fixed
//! values, three-point triangle and PERT estimates, uniform ranges). A
//! distribution is plain data until [`Distribution::bind`] compiles it into
//! a [`Sampler`] against a worker's random source.
//!
//! The `*Once` families exist for quantities that are uncertain but constant
//! within a draw, like a negotiated rate: they consume one sample at bind
//! time and return that value forever after.

use rand::Rng;
use rand_distr::Distribution as _;
use serde::{Deserialize, Serialize};

use crate::error::DistributionError;

/// A distribution family with its parameters.
///
/// Serialized form is internally tagged, e.g.
/// `{"type": "tri", "min": 50.0, "max": 100.0, "mode": 70.0}` or
/// `{"type": "fixed", "val": 5.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Distribution {
    /// Always the same value; drawing consumes no randomness
    #[serde(rename = "fixed")]
    Fixed {
        #[serde(rename = "val")]
        value: f64,
    },
    /// Triangle distribution over `[min, max]` peaking at `mode`
    #[serde(rename = "tri")]
    Triangle { min: f64, max: f64, mode: f64 },
    /// Triangle distribution sampled once at bind time, constant afterwards
    #[serde(rename = "tri_one")]
    TriangleOnce { min: f64, max: f64, mode: f64 },
    /// PERT distribution over `[min, max]` with most-likely value `mode`
    #[serde(rename = "pert")]
    Pert { min: f64, max: f64, mode: f64 },
    /// PERT distribution sampled once at bind time, constant afterwards
    #[serde(rename = "pert_one")]
    PertOnce { min: f64, max: f64, mode: f64 },
    /// Uniform distribution over `[min, max]`
    #[serde(rename = "uniform")]
    Uniform { min: f64, max: f64 },
}

impl Distribution {
    /// Family name for diagnostics.
    pub fn family(&self) -> &'static str {
        match self {
            Distribution::Fixed { .. } => "fixed",
            Distribution::Triangle { .. } => "triangle",
            Distribution::TriangleOnce { .. } => "triangle-once",
            Distribution::Pert { .. } => "pert",
            Distribution::PertOnce { .. } => "pert-once",
            Distribution::Uniform { .. } => "uniform",
        }
    }

    /// Check the family's parameter constraints.
    ///
    /// Triangle and PERT families require `min < max` and
    /// `min <= mode <= max`; uniform requires `min <= max`. NaN parameters
    /// fail these comparisons and are rejected. Invalid parameters are an
    /// error, never clamped.
    pub fn validate(&self) -> Result<(), DistributionError> {
        match *self {
            Distribution::Fixed { .. } => Ok(()),
            Distribution::Triangle { min, max, mode }
            | Distribution::TriangleOnce { min, max, mode }
            | Distribution::Pert { min, max, mode }
            | Distribution::PertOnce { min, max, mode } => {
                if !(min < max) {
                    return Err(self.invalid("min must be strictly less than max"));
                }
                if !(min <= mode && mode <= max) {
                    return Err(self.invalid("mode must lie within [min, max]"));
                }
                Ok(())
            }
            Distribution::Uniform { min, max } => {
                if !(min <= max) {
                    return Err(self.invalid("min must not exceed max"));
                }
                Ok(())
            }
        }
    }

    /// Validate and compile into a [`Sampler`] bound to the caller's RNG.
    ///
    /// For the `*Once` families this draws the frozen sample here, advancing
    /// `rng`; the other families leave `rng` untouched until the first
    /// [`Sampler::sample`] call.
    pub fn bind<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sampler, DistributionError> {
        self.validate()?;
        let sampler = match *self {
            Distribution::Fixed { value } => Sampler::Fixed(value),
            Distribution::Triangle { min, max, mode } => {
                Sampler::Triangle(self.triangular(min, max, mode)?)
            }
            Distribution::TriangleOnce { min, max, mode } => {
                Sampler::Fixed(self.triangular(min, max, mode)?.sample(rng))
            }
            Distribution::Pert { min, max, mode } => Sampler::Pert(self.pert(min, max, mode)?),
            Distribution::PertOnce { min, max, mode } => {
                Sampler::Fixed(self.pert(min, max, mode)?.sample(rng))
            }
            Distribution::Uniform { min, max } => {
                let uniform = rand_distr::Uniform::new_inclusive(min, max)
                    .map_err(|_| self.invalid("rejected by the sampling backend"))?;
                Sampler::Uniform(uniform)
            }
        };
        Ok(sampler)
    }

    fn triangular(
        &self,
        min: f64,
        max: f64,
        mode: f64,
    ) -> Result<rand_distr::Triangular<f64>, DistributionError> {
        rand_distr::Triangular::new(min, max, mode)
            .map_err(|_| self.invalid("rejected by the sampling backend"))
    }

    fn pert(
        &self,
        min: f64,
        max: f64,
        mode: f64,
    ) -> Result<rand_distr::Pert<f64>, DistributionError> {
        rand_distr::Pert::new(min, max)
            .with_mode(mode)
            .map_err(|_| self.invalid("rejected by the sampling backend"))
    }

    fn invalid(&self, reason: &'static str) -> DistributionError {
        let (min, max, mode) = match *self {
            Distribution::Fixed { value } => (value, value, None),
            Distribution::Triangle { min, max, mode }
            | Distribution::TriangleOnce { min, max, mode }
            | Distribution::Pert { min, max, mode }
            | Distribution::PertOnce { min, max, mode } => (min, max, Some(mode)),
            Distribution::Uniform { min, max } => (min, max, None),
        };
        DistributionError::InvalidParameters {
            family: self.family(),
            min,
            max,
            mode,
            reason,
        }
    }
}

/// A compiled distribution, ready to draw values from a random source.
///
/// Samplers are bound once per worker and share that worker's RNG; each
/// [`Sampler::sample`] call advances the RNG except for `Fixed`, which
/// consumes no randomness.
#[derive(Debug, Clone)]
pub enum Sampler {
    Fixed(f64),
    Triangle(rand_distr::Triangular<f64>),
    Pert(rand_distr::Pert<f64>),
    Uniform(rand_distr::Uniform<f64>),
}

impl Sampler {
    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Fixed(value) => *value,
            Sampler::Triangle(dist) => dist.sample(rng),
            Sampler::Pert(dist) => dist.sample(rng),
            Sampler::Uniform(dist) => dist.sample(rng),
        }
    }
}

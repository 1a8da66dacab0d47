//! Response curves: configurable mappings from a raw scalar to a bounded score
//!
//! Every scoring component in the engine shapes its inputs through a
//! [`Curve`]. A curve owns an input domain, an output range, and a shape;
//! evaluation normalizes the input into the domain, applies the shape, and
//! maps the result into the output range. Three normalization families are
//! provided: clamp-to-domain, ignore-domain-bounds (for externally-derived
//! ranges), and fixed 0-100 input scale.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The shape applied to the normalized input t in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveShape {
    /// Always returns the top of the output range
    Constant,
    /// y = t
    Linear,
    /// y = t^2, slow start
    Quadratic,
    /// y = 1 - (1-t)^2, fast start
    InverseQuadratic,
    /// Smooth ease-in/ease-out
    Sine,
    /// Sigmoid centered at t = 0.5
    Logistic { steepness: f32 },
    /// 0 below the threshold, 1 at or above it
    Step { threshold: f32 },
}

impl CurveShape {
    /// Shape value for normalized input. Inputs outside [0, 1] are allowed
    /// (the bounds-ignoring eval modes produce them); the final output is
    /// clamped to the curve's range, not here.
    fn value(&self, t: f32) -> f32 {
        match self {
            CurveShape::Constant => 1.0,
            CurveShape::Linear => t,
            CurveShape::Quadratic => t * t,
            CurveShape::InverseQuadratic => 1.0 - (1.0 - t) * (1.0 - t),
            CurveShape::Sine => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
            CurveShape::Logistic { steepness } => 1.0 / (1.0 + (-steepness * (t - 0.5)).exp()),
            CurveShape::Step { threshold } => {
                if t >= *threshold {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A response curve: immutable configuration, shared by many agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub shape: CurveShape,
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Curve {
    pub fn new(shape: CurveShape, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            shape,
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Curve over [0, 1] producing [0, 1]
    pub fn unit(shape: CurveShape) -> Self {
        Self::new(shape, 0.0, 1.0, 0.0, 1.0)
    }

    /// Curve over a 0-100 level scale producing [0, 1]
    pub fn over_levels(shape: CurveShape) -> Self {
        Self::new(shape, 0.0, 100.0, 0.0, 1.0)
    }

    /// Map a normalized input through the shape into the output range
    fn map(&self, t: f32) -> f32 {
        let y = self.y_min + self.shape.value(t) * (self.y_max - self.y_min);
        let (lo, hi) = if self.y_min <= self.y_max {
            (self.y_min, self.y_max)
        } else {
            (self.y_max, self.y_min)
        };
        y.clamp(lo, hi)
    }

    fn degenerate_domain(&self) -> bool {
        if self.x_min >= self.x_max {
            tracing::warn!(
                x_min = self.x_min,
                x_max = self.x_max,
                "curve has a degenerate input domain"
            );
            true
        } else {
            false
        }
    }

    /// Clamp the input into the curve's domain, then evaluate
    pub fn eval(&self, x: f32) -> f32 {
        if self.degenerate_domain() {
            return self.y_min;
        }
        let t = (x.clamp(self.x_min, self.x_max) - self.x_min) / (self.x_max - self.x_min);
        self.map(t)
    }

    /// Evaluate without clamping the input into the curve's own domain
    ///
    /// Used when the caller supplies a value from an externally-derived
    /// range (e.g. another agent's attribute scale). The output is still
    /// clamped into the curve's range.
    pub fn eval_ignore_bounds(&self, x: f32) -> f32 {
        if self.degenerate_domain() {
            return self.y_min;
        }
        let t = (x - self.x_min) / (self.x_max - self.x_min);
        self.map(t)
    }

    /// Evaluate an input on a fixed 0-100 scale, clamped
    pub fn eval_0_to_100(&self, x: f32) -> f32 {
        self.map(x.clamp(0.0, 100.0) / 100.0)
    }

    /// Evaluate an input on a fixed 0-100 scale without clamping
    pub fn eval_0_to_100_ignore_bounds(&self, x: f32) -> f32 {
        self.map(x / 100.0)
    }

    /// Normalize the input against a caller-supplied domain, then evaluate
    pub fn normalize_and_eval(&self, x: f32, domain_min: f32, domain_max: f32) -> f32 {
        if domain_min >= domain_max {
            tracing::warn!(
                domain_min,
                domain_max,
                "normalize_and_eval called with a degenerate domain"
            );
            return self.y_min;
        }
        let t = ((x - domain_min) / (domain_max - domain_min)).clamp(0.0, 1.0);
        self.map(t)
    }

    /// Draw a uniform sample inside the curve's domain and evaluate it
    ///
    /// Used for stochastic scoring. Callers that need reproducibility
    /// inject a seeded RNG.
    pub fn eval_random<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.degenerate_domain() {
            return self.y_min;
        }
        let x = rng.gen_range(self.x_min..=self.x_max);
        self.eval(x)
    }
}

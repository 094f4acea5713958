//! Time-dependent coefficients evaluated as pure functions of simulation time.

use serde::{Deserialize, Serialize};

/// Scalar coefficient that may vary with simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Coefficient {
    /// Fixed value.
    Constant {
        /// Value returned for every `t`.
        value: f64,
    },
    /// `base * (1 + depth * sin(frequency * t))`.
    Modulated {
        /// Mean value of the coefficient.
        base: f64,
        /// Relative modulation depth.
        depth: f64,
        /// Angular frequency of the modulation.
        frequency: f64,
    },
}

impl Coefficient {
    /// Shorthand for [`Coefficient::Constant`].
    pub const fn constant(value: f64) -> Self {
        Coefficient::Constant { value }
    }

    /// Evaluates the coefficient at time `t`.
    pub fn at(&self, t: f64) -> f64 {
        match *self {
            Coefficient::Constant { value } => value,
            Coefficient::Modulated {
                base,
                depth,
                frequency,
            } => base * (1.0 + depth * (frequency * t).sin()),
        }
    }

    /// Largest magnitude the coefficient can reach.
    pub fn peak(&self) -> f64 {
        match *self {
            Coefficient::Constant { value } => value.abs(),
            Coefficient::Modulated { base, depth, .. } => base.abs() * (1.0 + depth.abs()),
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::constant(0.0)
    }
}

/// External periodic drive contributing `-amplitude * cos(frequency * t) * phi^2`
/// to the potential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    /// Drive amplitude `epsilon`.
    pub amplitude: f64,
    /// Drive angular frequency `omega`.
    pub frequency: f64,
}

impl Drive {
    /// Instantaneous drive strength `epsilon * cos(omega * t)`.
    pub fn strength(&self, t: f64) -> f64 {
        self.amplitude * (self.frequency * t).cos()
    }
}

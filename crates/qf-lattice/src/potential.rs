//! On-site potentials and their analytic derivatives.
//!
//! The integrator only ever sees [`Potential::derivative`] and the energy
//! diagnostics only ever see [`Potential::value`]; both are implemented side
//! by side here so that one is always the exact derivative of the other.

use serde::{Deserialize, Serialize};

use crate::coefficient::{Coefficient, Drive};

/// Scalar on-site potential `V(phi, t)`.
pub trait Potential {
    /// Potential energy density at field value `phi` and time `t`.
    fn value(&self, phi: f64, t: f64) -> f64;

    /// Analytic derivative `dV/dphi` at field value `phi` and time `t`.
    fn derivative(&self, phi: f64, t: f64) -> f64;
}

impl<P: Potential + ?Sized> Potential for &P {
    fn value(&self, phi: f64, t: f64) -> f64 {
        (**self).value(phi, t)
    }

    fn derivative(&self, phi: f64, t: f64) -> f64 {
        (**self).derivative(phi, t)
    }
}

/// Shape of the nonlinear self-interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SelfInteraction {
    /// `lambda/4 * phi^4`.
    #[default]
    Quartic,
    /// Symmetric double well `lambda/4 * (phi^2 - vev^2)^2`.
    DoubleWell {
        /// Location of the two minima.
        vev: f64,
    },
}

fn default_mass() -> f64 {
    1.0
}

fn default_self_coupling() -> Coefficient {
    Coefficient::constant(0.1)
}

/// Single-field potential
/// `1/2 m^2 phi^2 + self_interaction(lambda(t)) - epsilon cos(omega t) phi^2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelfPotential {
    /// Mass `m` of the field.
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Self-coupling `lambda`, optionally time dependent.
    #[serde(default = "default_self_coupling")]
    pub coupling: Coefficient,
    /// Shape of the self-interaction term.
    #[serde(default)]
    pub interaction: SelfInteraction,
    /// Optional external drive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<Drive>,
}

impl Default for SelfPotential {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            coupling: default_self_coupling(),
            interaction: SelfInteraction::Quartic,
            drive: None,
        }
    }
}

impl SelfPotential {
    /// Massive quartic potential `1/2 m^2 phi^2 + lambda/4 phi^4`.
    pub fn quartic(mass: f64, lambda: f64) -> Self {
        Self {
            mass,
            coupling: Coefficient::constant(lambda),
            interaction: SelfInteraction::Quartic,
            drive: None,
        }
    }

    /// Massless double well `lambda/4 (phi^2 - vev^2)^2`.
    pub fn double_well(lambda: Coefficient, vev: f64) -> Self {
        Self {
            mass: 0.0,
            coupling: lambda,
            interaction: SelfInteraction::DoubleWell { vev },
            drive: None,
        }
    }

    /// Adds an external drive.
    pub fn with_drive(mut self, drive: Drive) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Rough upper bound on the curvature `d^2V/dphi^2` for `|phi| <= amplitude`,
    /// used to sanity check the time step.
    pub fn stiffness(&self, amplitude: f64) -> f64 {
        let lambda = self.coupling.peak();
        let nonlinear = match self.interaction {
            SelfInteraction::Quartic => 3.0 * lambda * amplitude * amplitude,
            SelfInteraction::DoubleWell { vev } => {
                lambda * (3.0 * amplitude * amplitude + vev * vev)
            }
        };
        let drive = self.drive.map(|d| 2.0 * d.amplitude.abs()).unwrap_or(0.0);
        self.mass * self.mass + nonlinear + drive
    }
}

impl Potential for SelfPotential {
    fn value(&self, phi: f64, t: f64) -> f64 {
        let lambda = self.coupling.at(t);
        let phi2 = phi * phi;
        let mut value = 0.5 * self.mass * self.mass * phi2;
        value += match self.interaction {
            SelfInteraction::Quartic => 0.25 * lambda * phi2 * phi2,
            SelfInteraction::DoubleWell { vev } => {
                let shifted = phi2 - vev * vev;
                0.25 * lambda * shifted * shifted
            }
        };
        if let Some(drive) = &self.drive {
            value -= drive.strength(t) * phi2;
        }
        value
    }

    fn derivative(&self, phi: f64, t: f64) -> f64 {
        let lambda = self.coupling.at(t);
        let phi2 = phi * phi;
        let mut force = self.mass * self.mass * phi;
        force += match self.interaction {
            SelfInteraction::Quartic => lambda * phi2 * phi,
            SelfInteraction::DoubleWell { vev } => lambda * phi * (phi2 - vev * vev),
        };
        if let Some(drive) = &self.drive {
            force -= 2.0 * drive.strength(t) * phi;
        }
        force
    }
}

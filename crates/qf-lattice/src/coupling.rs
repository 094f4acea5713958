//! Interaction between the two fields of a coupled model.

use serde::{Deserialize, Serialize};

/// Functional form of the inter-field interaction potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CouplingForm {
    /// `V_int = -g phi^2 psi`; drives `phi` with `2 g phi psi` and `psi` with `g phi^2`.
    #[default]
    Cubic,
    /// `V_int = -g phi psi`; drives each field with `g` times the other.
    Bilinear,
}

/// Interaction between component 0 (`phi`) and component 1 (`psi`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    /// Coupling constant `g`.
    pub strength: f64,
    /// Functional form.
    #[serde(default)]
    pub form: CouplingForm,
}

impl Coupling {
    /// Cubic coupling with constant `g`.
    pub fn cubic(strength: f64) -> Self {
        Self {
            strength,
            form: CouplingForm::Cubic,
        }
    }

    /// Bilinear coupling with constant `g`.
    pub fn bilinear(strength: f64) -> Self {
        Self {
            strength,
            form: CouplingForm::Bilinear,
        }
    }

    /// Interaction energy density at one site.
    pub fn value(&self, phi: f64, psi: f64) -> f64 {
        match self.form {
            CouplingForm::Cubic => -self.strength * phi * phi * psi,
            CouplingForm::Bilinear => -self.strength * phi * psi,
        }
    }

    /// Partial derivatives `(dV_int/dphi, dV_int/dpsi)` at one site.
    pub fn gradient(&self, phi: f64, psi: f64) -> (f64, f64) {
        let g = self.strength;
        match self.form {
            CouplingForm::Cubic => (-2.0 * g * phi * psi, -g * phi * phi),
            CouplingForm::Bilinear => (-g * psi, -g * phi),
        }
    }
}

//! Immutable parameter record for a lattice run.

use qf_core::errors::{ErrorInfo, QfError};
use qf_core::Grid;
use serde::{Deserialize, Serialize};

use crate::coupling::Coupling;
use crate::integrator::Scheme;
use crate::potential::{Potential, SelfPotential};
use crate::stencil;
use crate::LatticeState;

/// Largest number of simultaneously evolved fields.
pub const MAX_COMPONENTS: usize = 2;

fn model_error(code: &str, message: impl Into<String>) -> QfError {
    QfError::Model(ErrorInfo::new(code, message))
}

/// Parameters shared by the integrator and the energy diagnostics.
///
/// Built once before a run and only borrowed afterwards, so the grid and the
/// time step cannot change mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    grid: Grid,
    dt: f64,
    potentials: Vec<SelfPotential>,
    coupling: Option<Coupling>,
    scheme: Scheme,
}

impl FieldModel {
    /// Validates and assembles a model.
    pub fn new(
        grid: Grid,
        dt: f64,
        potentials: Vec<SelfPotential>,
        coupling: Option<Coupling>,
        scheme: Scheme,
    ) -> Result<Self, QfError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(QfError::Model(
                ErrorInfo::new("invalid-dt", "time step must be positive and finite")
                    .with_context("dt", dt),
            ));
        }
        if potentials.is_empty() || potentials.len() > MAX_COMPONENTS {
            return Err(QfError::Model(
                ErrorInfo::new("component-count", "a model evolves one or two fields")
                    .with_context("components", potentials.len()),
            ));
        }
        if coupling.is_some() && potentials.len() != 2 {
            return Err(model_error(
                "coupling-needs-two-fields",
                "an inter-field coupling requires exactly two components",
            ));
        }
        Ok(Self {
            grid,
            dt,
            potentials,
            coupling,
            scheme,
        })
    }

    /// Single free-standing field.
    pub fn single(grid: Grid, dt: f64, potential: SelfPotential) -> Result<Self, QfError> {
        Self::new(grid, dt, vec![potential], None, Scheme::default())
    }

    /// Returns a copy using a different integration scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Lattice the fields live on.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid spacing.
    pub fn dx(&self) -> f64 {
        self.grid.spacing()
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of evolved fields.
    pub fn components(&self) -> usize {
        self.potentials.len()
    }

    /// On-site potential of one component.
    pub fn potential(&self, component: usize) -> &SelfPotential {
        &self.potentials[component]
    }

    /// Inter-field coupling, if any.
    pub fn coupling(&self) -> Option<&Coupling> {
        self.coupling.as_ref()
    }

    /// Integration scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Checks that `state` has the component count and grid size of the model.
    pub fn check_state(&self, state: &LatticeState) -> Result<(), QfError> {
        if state.components.len() != self.components() {
            return Err(QfError::Model(
                ErrorInfo::new("state-components", "state and model disagree on field count")
                    .with_context("model", self.components())
                    .with_context("state", state.components.len()),
            ));
        }
        if state.points() != self.grid.points() {
            return Err(QfError::Model(
                ErrorInfo::new("state-points", "state and grid disagree on size")
                    .with_context("grid", self.grid.points())
                    .with_context("state", state.points()),
            ));
        }
        Ok(())
    }

    /// Total potential energy density at one site, interaction included.
    pub fn potential_density(&self, values: &[f64], t: f64) -> f64 {
        let mut density: f64 = self
            .potentials
            .iter()
            .zip(values)
            .map(|(potential, &phi)| potential.value(phi, t))
            .sum();
        if let (Some(coupling), [phi, psi]) = (&self.coupling, values) {
            density += coupling.value(*phi, *psi);
        }
        density
    }

    /// Writes `lap - dV/dphi - dV_int/dphi` for every component into `out`.
    ///
    /// `out` must hold one buffer of grid length per component.
    pub fn force_into(&self, state: &LatticeState, t: f64, out: &mut [Vec<f64>]) {
        let dx = self.dx();
        for ((component, potential), force) in state
            .components
            .iter()
            .zip(&self.potentials)
            .zip(out.iter_mut())
        {
            stencil::laplacian_into(&component.field, dx, force);
            for (f, &phi) in force.iter_mut().zip(&component.field) {
                *f -= potential.derivative(phi, t);
            }
        }
        if let Some(coupling) = &self.coupling {
            let mut values = [0.0; MAX_COMPONENTS];
            for site in 0..state.points() {
                state.site_values(site, &mut values);
                let (d_phi, d_psi) = coupling.gradient(values[0], values[1]);
                out[0][site] -= d_phi;
                out[1][site] -= d_psi;
            }
        }
    }

    /// `dt * omega_max`, the explicit-stability figure of merit for fields
    /// bounded by `amplitude`. Values well below 2 are stable for the
    /// symplectic schemes.
    pub fn courant_number(&self, amplitude: f64) -> f64 {
        let dx = self.dx();
        let stiffness = self
            .potentials
            .iter()
            .map(|potential| potential.stiffness(amplitude))
            .fold(0.0_f64, f64::max);
        let coupling = self
            .coupling
            .map(|c| 2.0 * c.strength.abs() * amplitude.max(1.0))
            .unwrap_or(0.0);
        self.dt * (4.0 / (dx * dx) + stiffness + coupling).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Component;

    fn grid() -> Grid {
        Grid::new(16, 1.6).unwrap()
    }

    #[test]
    fn rejects_invalid_parameters() {
        let potential = SelfPotential::default();
        assert_eq!(
            FieldModel::single(grid(), 0.0, potential).unwrap_err().code(),
            "invalid-dt"
        );
        assert_eq!(
            FieldModel::new(grid(), 0.01, vec![], None, Scheme::default())
                .unwrap_err()
                .code(),
            "component-count"
        );
        assert_eq!(
            FieldModel::new(
                grid(),
                0.01,
                vec![potential],
                Some(Coupling::cubic(0.5)),
                Scheme::default()
            )
            .unwrap_err()
            .code(),
            "coupling-needs-two-fields"
        );
    }

    #[test]
    fn force_on_uniform_field_is_minus_potential_slope() {
        let model = FieldModel::single(grid(), 0.01, SelfPotential::quartic(1.0, 0.1)).unwrap();
        let state = LatticeState::new(vec![Component::at_rest(vec![2.0; 16])]).unwrap();
        let mut force = vec![vec![0.0; 16]];
        model.force_into(&state, 0.0, &mut force);
        let expected = -(2.0 + 0.1 * 8.0);
        assert!(force[0].iter().all(|&f| (f - expected).abs() < 1e-12));
    }

    #[test]
    fn coupled_force_includes_interaction() {
        let model = FieldModel::new(
            grid(),
            0.01,
            vec![SelfPotential::quartic(0.0, 0.0); 2],
            Some(Coupling::cubic(0.5)),
            Scheme::default(),
        )
        .unwrap();
        let state = LatticeState::new(vec![
            Component::at_rest(vec![1.0; 16]),
            Component::at_rest(vec![2.0; 16]),
        ])
        .unwrap();
        let mut force = vec![vec![0.0; 16]; 2];
        model.force_into(&state, 0.0, &mut force);
        assert!(force[0].iter().all(|&f| (f - 2.0).abs() < 1e-12));
        assert!(force[1].iter().all(|&f| (f - 0.5).abs() < 1e-12));
        assert!((model.potential_density(&[1.0, 2.0], 0.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn check_state_detects_shape_mismatch() {
        let model = FieldModel::single(grid(), 0.01, SelfPotential::default()).unwrap();
        let state = LatticeState::new(vec![Component::at_rest(vec![0.0; 8])]).unwrap();
        assert_eq!(model.check_state(&state).unwrap_err().code(), "state-points");
    }
}

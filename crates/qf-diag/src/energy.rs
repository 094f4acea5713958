//! Local energy density and total energy of a lattice state.

use qf_core::errors::QfError;
use qf_lattice::stencil::gradient_into;
use qf_lattice::{FieldModel, LatticeState, Potential};
use serde::{Deserialize, Serialize};

/// Per-site energy density `1/2 pi^2 + 1/2 (grad phi)^2 + V(phi, t)`.
///
/// The gradient is the periodic central difference. Never fails; mismatched
/// slices are truncated to the shorter length.
pub fn local_energy_density<P: Potential>(
    field: &[f64],
    momentum: &[f64],
    dx: f64,
    t: f64,
    potential: &P,
) -> Vec<f64> {
    let mut grad = vec![0.0; field.len()];
    gradient_into(field, dx, &mut grad);
    field
        .iter()
        .zip(momentum)
        .zip(&grad)
        .map(|((&phi, &pi), &g)| 0.5 * pi * pi + 0.5 * g * g + potential.value(phi, t))
        .collect()
}

/// Integrated energy split by contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    /// `sum 1/2 pi^2 dx` over all components.
    pub kinetic: f64,
    /// `sum 1/2 (grad phi)^2 dx` over all components.
    pub gradient: f64,
    /// On-site potential energy over all components.
    pub potential: f64,
    /// Inter-field interaction energy.
    pub interaction: f64,
    /// Sum of the above.
    pub total: f64,
}

impl EnergyBreakdown {
    /// Creates a zeroed breakdown.
    pub fn zero() -> Self {
        Self {
            kinetic: 0.0,
            gradient: 0.0,
            potential: 0.0,
            interaction: 0.0,
            total: 0.0,
        }
    }
}

/// Integrates the energy of `state` under `model` at time `t`.
pub fn energy_breakdown(
    state: &LatticeState,
    model: &FieldModel,
    t: f64,
) -> Result<EnergyBreakdown, QfError> {
    model.check_state(state)?;
    let dx = model.dx();
    let mut breakdown = EnergyBreakdown::zero();
    let mut grad = vec![0.0; state.points()];
    for (index, component) in state.components.iter().enumerate() {
        let potential = model.potential(index);
        gradient_into(&component.field, dx, &mut grad);
        for ((&phi, &pi), &g) in component.field.iter().zip(&component.momentum).zip(&grad) {
            breakdown.kinetic += 0.5 * pi * pi * dx;
            breakdown.gradient += 0.5 * g * g * dx;
            breakdown.potential += potential.value(phi, t) * dx;
        }
    }
    if let (Some(coupling), [phi, psi]) = (model.coupling(), state.components.as_slice()) {
        breakdown.interaction = phi
            .field
            .iter()
            .zip(&psi.field)
            .map(|(&a, &b)| coupling.value(a, b) * dx)
            .sum();
    }
    breakdown.total =
        breakdown.kinetic + breakdown.gradient + breakdown.potential + breakdown.interaction;
    Ok(breakdown)
}

/// Total energy `sum(kinetic + gradient + potential + interaction) dx`.
pub fn total_energy(state: &LatticeState, model: &FieldModel, t: f64) -> Result<f64, QfError> {
    Ok(energy_breakdown(state, model, t)?.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qf_core::Grid;
    use qf_lattice::{Component, Coupling, Scheme, SelfPotential};

    #[test]
    fn density_of_uniform_field_is_potential_only() {
        let potential = SelfPotential::quartic(1.0, 0.1);
        let density = local_energy_density(&[2.0; 8], &[0.0; 8], 0.1, 0.0, &potential);
        assert!(density.iter().all(|&e| (e - (2.0 + 0.4)).abs() < 1e-12));
    }

    #[test]
    fn breakdown_sums_parts() {
        let grid = Grid::new(8, 8.0).unwrap();
        let model = FieldModel::new(
            grid,
            0.01,
            vec![SelfPotential::quartic(0.0, 0.0); 2],
            Some(Coupling::bilinear(1.0)),
            Scheme::default(),
        )
        .unwrap();
        let state = LatticeState::new(vec![
            Component::new(vec![1.0; 8], vec![2.0; 8]).unwrap(),
            Component::at_rest(vec![3.0; 8]),
        ])
        .unwrap();
        let breakdown = energy_breakdown(&state, &model, 0.0).unwrap();
        assert_eq!(breakdown.kinetic, 16.0);
        assert_eq!(breakdown.gradient, 0.0);
        assert_eq!(breakdown.potential, 0.0);
        assert_eq!(breakdown.interaction, -24.0);
        assert_eq!(breakdown.total, -8.0);
        assert_eq!(total_energy(&state, &model, 0.0).unwrap(), -8.0);
    }

    #[test]
    fn mismatched_state_is_rejected() {
        let grid = Grid::new(8, 8.0).unwrap();
        let model = FieldModel::single(grid, 0.01, SelfPotential::default()).unwrap();
        let state = LatticeState::new(vec![Component::at_rest(vec![0.0; 4])]).unwrap();
        assert!(energy_breakdown(&state, &model, 0.0).is_err());
    }
}

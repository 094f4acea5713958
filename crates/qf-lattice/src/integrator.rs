//! Explicit time stepping for [`LatticeState`].
//!
//! All schemes are explicit and conditionally stable: the caller chooses `dt`
//! small relative to `dx` and the stiffest coefficient. Nothing here adapts
//! the step or inspects the state for divergence.

use qf_core::errors::QfError;
use serde::{Deserialize, Serialize};

use crate::model::FieldModel;
use crate::LatticeState;

/// Update convention applied by [`Integrator::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// Kick then drift with the updated momentum:
    /// `pi += dt F(phi, t); phi += dt pi`.
    #[default]
    SymplecticEuler,
    /// Drift with the pre-update momentum, then kick with the pre-update force:
    /// `phi' = phi + dt pi; pi' = pi + dt F(phi, t)`.
    ForwardEuler,
    /// Half kick, full drift, half kick with the force re-evaluated at `t + dt`.
    VelocityVerlet,
}

/// Stateless stepping engine holding scratch buffers for the force.
#[derive(Debug, Clone)]
pub struct Integrator<'m> {
    model: &'m FieldModel,
    force: Vec<Vec<f64>>,
}

impl<'m> Integrator<'m> {
    /// Allocates scratch space for `model`.
    pub fn new(model: &'m FieldModel) -> Self {
        let points = model.grid().points();
        Self {
            model,
            force: vec![vec![0.0; points]; model.components()],
        }
    }

    /// Model the integrator advances.
    pub fn model(&self) -> &FieldModel {
        self.model
    }

    /// Advances `state` from time `t` to `t + dt` in place.
    ///
    /// Fails without touching `state` when its shape disagrees with the model.
    pub fn step(&mut self, state: &mut LatticeState, t: f64) -> Result<(), QfError> {
        self.model.check_state(state)?;
        let dt = self.model.dt();
        match self.model.scheme() {
            Scheme::SymplecticEuler => {
                self.model.force_into(state, t, &mut self.force);
                kick(state, &self.force, dt);
                drift(state, dt);
            }
            Scheme::ForwardEuler => {
                self.model.force_into(state, t, &mut self.force);
                drift(state, dt);
                kick(state, &self.force, dt);
            }
            Scheme::VelocityVerlet => {
                self.model.force_into(state, t, &mut self.force);
                kick(state, &self.force, 0.5 * dt);
                drift(state, dt);
                self.model.force_into(state, t + dt, &mut self.force);
                kick(state, &self.force, 0.5 * dt);
            }
        }
        Ok(())
    }
}

/// One-shot convenience wrapper around [`Integrator::step`].
pub fn step(state: &mut LatticeState, model: &FieldModel, t: f64) -> Result<(), QfError> {
    Integrator::new(model).step(state, t)
}

fn kick(state: &mut LatticeState, force: &[Vec<f64>], dt: f64) {
    for (component, force) in state.components.iter_mut().zip(force) {
        for (pi, f) in component.momentum.iter_mut().zip(force) {
            *pi += dt * f;
        }
    }
}

fn drift(state: &mut LatticeState, dt: f64) {
    for component in &mut state.components {
        for (phi, pi) in component.field.iter_mut().zip(&component.momentum) {
            *phi += dt * pi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::SelfPotential;
    use crate::state::Component;
    use qf_core::Grid;

    fn oscillator(scheme: Scheme) -> (FieldModel, LatticeState) {
        let grid = Grid::new(4, 4.0).unwrap();
        let model = FieldModel::single(grid, 0.1, SelfPotential::quartic(1.0, 0.0))
            .unwrap()
            .with_scheme(scheme);
        let state = LatticeState::new(vec![Component::at_rest(vec![1.0; 4])]).unwrap();
        (model, state)
    }

    #[test]
    fn symplectic_euler_uses_updated_momentum() {
        let (model, mut state) = oscillator(Scheme::SymplecticEuler);
        step(&mut state, &model, 0.0).unwrap();
        let c = &state.components[0];
        assert!((c.momentum[0] + 0.1).abs() < 1e-15);
        assert!((c.field[0] - 0.99).abs() < 1e-15);
    }

    #[test]
    fn forward_euler_uses_previous_momentum() {
        let (model, mut state) = oscillator(Scheme::ForwardEuler);
        step(&mut state, &model, 0.0).unwrap();
        let c = &state.components[0];
        assert!((c.momentum[0] + 0.1).abs() < 1e-15);
        assert_eq!(c.field[0], 1.0);
    }

    #[test]
    fn velocity_verlet_tracks_harmonic_motion() {
        let (model, mut state) = oscillator(Scheme::VelocityVerlet);
        let mut integrator = Integrator::new(&model);
        for n in 0..100 {
            integrator.step(&mut state, n as f64 * 0.1).unwrap();
        }
        let exact = (10.0_f64).cos();
        assert!((state.components[0].field[0] - exact).abs() < 1e-2);
    }

    #[test]
    fn step_changes_only_in_place_state() {
        let (model, mut state) = oscillator(Scheme::SymplecticEuler);
        let before = state.clone();
        step(&mut state, &model, 0.0).unwrap();
        assert_ne!(before, state);
        assert_eq!(before.components[0].field, vec![1.0; 4]);
    }

    #[test]
    fn mismatched_state_is_rejected_untouched() {
        let (model, _) = oscillator(Scheme::SymplecticEuler);
        let mut short = LatticeState::new(vec![Component::at_rest(vec![1.0; 3])]).unwrap();
        let err = step(&mut short, &model, 0.0).unwrap_err();
        assert_eq!(err.code(), "state-points");
        assert_eq!(short.components[0].field, vec![1.0; 3]);

        let mut pair = LatticeState::new(vec![
            Component::at_rest(vec![1.0; 4]),
            Component::at_rest(vec![1.0; 4]),
        ])
        .unwrap();
        let err = Integrator::new(&model).step(&mut pair, 0.0).unwrap_err();
        assert_eq!(err.code(), "state-components");
    }
}

use qf_core::Grid;
use qf_diag::total_energy;
use qf_lattice::{Component, FieldModel, Integrator, LatticeState, Profile, Scheme, SelfPotential};

fn gaussian_run(scheme: Scheme, steps: usize) -> (f64, f64) {
    let grid = Grid::new(100, 10.0).unwrap();
    let model = FieldModel::single(grid, 0.01, SelfPotential::quartic(1.0, 0.1))
        .unwrap()
        .with_scheme(scheme);
    let field = Profile::centered_gaussian(1.0, 0.5).sample(&grid).unwrap();
    let mut state = LatticeState::new(vec![Component::at_rest(field)]).unwrap();
    let initial = total_energy(&state, &model, 0.0).unwrap();
    let mut integrator = Integrator::new(&model);
    for n in 0..steps {
        integrator.step(&mut state, n as f64 * model.dt()).unwrap();
    }
    let last = total_energy(&state, &model, steps as f64 * model.dt()).unwrap();
    (initial, last)
}

#[test]
fn symplectic_euler_energy_drift_is_small() {
    let (initial, last) = gaussian_run(Scheme::SymplecticEuler, 100);
    assert!(initial > 0.0);
    let drift = (last - initial).abs() / initial.abs();
    assert!(drift < 0.05, "relative drift {drift}");
}

#[test]
fn velocity_verlet_energy_drift_is_small() {
    let (initial, last) = gaussian_run(Scheme::VelocityVerlet, 1000);
    let drift = (last - initial).abs() / initial.abs();
    assert!(drift < 0.05, "relative drift {drift}");
}

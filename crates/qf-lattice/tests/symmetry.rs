use qf_core::Grid;
use qf_lattice::{Component, FieldModel, Integrator, LatticeState, Scheme, SelfPotential};

const POINTS: usize = 100;
const MID: usize = 50;

fn mirrored_gaussian() -> Vec<f64> {
    let dx = 0.1;
    (0..POINTS)
        .map(|i| {
            let offset = i.abs_diff(MID);
            let distance = offset.min(POINTS - offset) as f64 * dx;
            (-(distance * distance) / 0.5).exp()
        })
        .collect()
}

fn assert_mirror_symmetric(field: &[f64]) {
    for j in 1..MID {
        let right = field[MID + j];
        let left = field[MID - j];
        assert!(
            (right - left).abs() <= 1e-12 * (1.0 + right.abs()),
            "asymmetry at offset {j}: {left} vs {right}"
        );
    }
}

#[test]
fn symmetric_profile_stays_symmetric() {
    let grid = Grid::new(POINTS, 10.0).unwrap();
    for scheme in [
        Scheme::SymplecticEuler,
        Scheme::ForwardEuler,
        Scheme::VelocityVerlet,
    ] {
        let model = FieldModel::single(grid, 0.01, SelfPotential::quartic(1.0, 0.1))
            .unwrap()
            .with_scheme(scheme);
        let mut state = LatticeState::new(vec![Component::at_rest(mirrored_gaussian())]).unwrap();
        assert_mirror_symmetric(&state.components[0].field);
        let mut integrator = Integrator::new(&model);
        for n in 0..500 {
            integrator.step(&mut state, n as f64 * model.dt()).unwrap();
            if n % 100 == 0 {
                assert_mirror_symmetric(&state.components[0].field);
                assert_mirror_symmetric(&state.components[0].momentum);
            }
        }
        assert_mirror_symmetric(&state.components[0].field);
    }
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let grid = Grid::new(POINTS, 10.0).unwrap();
    let model = FieldModel::single(grid, 0.01, SelfPotential::quartic(1.0, 0.1)).unwrap();
    let run = || {
        let mut state = LatticeState::new(vec![Component::at_rest(mirrored_gaussian())]).unwrap();
        let mut integrator = Integrator::new(&model);
        for n in 0..200 {
            integrator.step(&mut state, n as f64 * 0.01).unwrap();
        }
        state
    };
    assert_eq!(run(), run());
}

use qf_lattice::{
    Coefficient, Coupling, CouplingForm, InitialCondition, Profile, Scheme, SelfInteraction,
    SelfPotential,
};

#[test]
fn potential_defaults_fill_missing_fields() {
    let potential: SelfPotential = serde_yaml::from_str("{}").unwrap();
    assert_eq!(potential, SelfPotential::default());
    assert_eq!(potential.mass, 1.0);
    assert_eq!(potential.coupling, Coefficient::constant(0.1));
}

#[test]
fn driven_double_well_parses_from_yaml() {
    let yaml = r#"
mass: 0.0
coupling: { type: modulated, base: 0.1, depth: 0.2, frequency: 0.05 }
interaction: { type: double-well, vev: 1.0 }
drive: { amplitude: 0.05, frequency: 0.1 }
"#;
    let potential: SelfPotential = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(potential.interaction, SelfInteraction::DoubleWell { vev: 1.0 });
    assert_eq!(potential.drive.unwrap().amplitude, 0.05);
}

#[test]
fn initial_condition_and_coupling_parse() {
    let condition: InitialCondition =
        serde_yaml::from_str("field: { type: gaussian, amplitude: 1.0 }\nnoise: 0.001").unwrap();
    assert_eq!(
        condition.field,
        Profile::Gaussian {
            amplitude: 1.0,
            center: None,
            width: 0.5
        }
    );
    assert_eq!(condition.momentum, Profile::Zero);

    let coupling: Coupling = serde_yaml::from_str("strength: 0.5").unwrap();
    assert_eq!(coupling.form, CouplingForm::Cubic);
    let scheme: Scheme = serde_json::from_str("\"velocity-verlet\"").unwrap();
    assert_eq!(scheme, Scheme::VelocityVerlet);
}

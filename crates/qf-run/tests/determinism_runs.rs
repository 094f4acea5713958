use qf_lattice::{InitialCondition, Profile};
use qf_run::{run, RunConfig};

fn noisy_config(seed: u64) -> RunConfig {
    let mut config = RunConfig::social();
    config.time.steps = 120;
    config.sampling.snapshot_interval = 40;
    config.components[1].initial = InitialCondition {
        noise: Some(0.01),
        ..InitialCondition::at_rest(Profile::Sine {
            amplitude: 0.1,
            modes: 1.0,
        })
    };
    config.seed_policy.master_seed = seed;
    config
}

#[test]
fn repeated_runs_with_same_seed_match() {
    let config = noisy_config(42);
    let first = run(&config).unwrap();
    let second = run(&config).unwrap();
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.trajectory, second.trajectory);
    assert_eq!(first.profile, second.profile);
}

#[test]
fn different_seeds_change_noisy_runs() {
    let a = run(&noisy_config(1)).unwrap();
    let b = run(&noisy_config(2)).unwrap();
    assert_eq!(a.summary.config_hash.len(), 64);
    assert_ne!(a.summary.config_hash, b.summary.config_hash);
    assert_ne!(a.summary.series_hash, b.summary.series_hash);
}

#[test]
fn yaml_and_preset_configs_agree() {
    let yaml = r#"
grid: { points: 100, length: 10.0 }
time: { dt: 0.01, steps: 1000 }
components:
  - label: phi
    potential: { mass: 1.0, coupling: { type: constant, value: 0.1 } }
    initial:
      field: { type: gaussian, amplitude: 1.0, width: 0.5 }
"#;
    let parsed = RunConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(parsed, RunConfig::single());
}

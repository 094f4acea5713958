use proptest::prelude::*;
use qf_net::{simulate, NetworkConfig};

#[test]
fn dissolution_scenario_is_reproducible() {
    let config = NetworkConfig::dissolution();
    let first = simulate(&config).unwrap();
    let second = simulate(&config).unwrap();
    assert_eq!(first, second);

    for actor in &config.actors {
        let series = first
            .trajectory
            .series(&format!("power.{}", actor.label))
            .unwrap();
        assert_eq!(series.len(), 200);
        assert_eq!(series.values[0], actor.initial);
        assert!(series.values.iter().all(|v| v.is_finite() && *v >= 0.0));
    }
}

#[test]
fn government_power_collapses() {
    let run = simulate(&NetworkConfig::dissolution()).unwrap();
    let government = run.trajectory.series("power.government").unwrap();
    let start = government.values[0];
    let end = *government.values.last().unwrap();
    assert!(end < start, "{start} -> {end}");
    assert_eq!(run.summary.peak_power["government"].step, 0);
}

#[test]
fn seed_changes_noise_only() {
    let mut a = NetworkConfig::dissolution();
    let mut b = NetworkConfig::dissolution();
    a.seed_policy.master_seed = 3;
    b.seed_policy.master_seed = 4;
    assert_ne!(
        simulate(&a).unwrap().summary.series_hash,
        simulate(&b).unwrap().summary.series_hash
    );
    a.noise = 0.0;
    b.noise = 0.0;
    assert_eq!(
        simulate(&a).unwrap().summary.series_hash,
        simulate(&b).unwrap().summary.series_hash
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn floor_is_never_crossed(seed in any::<u64>(), floor in 0.0f64..0.5) {
        let mut config = NetworkConfig::dissolution();
        config.seed_policy.master_seed = seed;
        config.floor = Some(floor);
        config.anchors.clear();
        let run = simulate(&config).unwrap();
        for series in run.trajectory.all_series() {
            for value in &series.values[1..] {
                prop_assert!(*value >= floor - 1e-12);
            }
        }
    }
}

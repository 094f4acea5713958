//! Explicit Euler integration of the actor network.

use indexmap::IndexMap;
use qf_core::errors::{ErrorInfo, QfError};
use qf_core::RngHandle;
use qf_run::determinism::network_seed;
use qf_run::hash::stable_hash_string;
use qf_run::TrajectoryRecorder;
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::NetworkConfig;

/// Largest power an actor reached and when.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakPower {
    /// Step at which the maximum occurred.
    pub step: usize,
    /// Maximum power.
    pub value: f64,
}

/// Scalar outcome of a network run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Number of Euler updates.
    pub steps: usize,
    /// Simulation time after the last update.
    pub final_time: f64,
    /// Power per actor after the last update, in actor order.
    pub final_power: IndexMap<String, f64>,
    /// Peak power per actor, in actor order.
    pub peak_power: IndexMap<String, PeakPower>,
    /// Master seed of the run.
    pub seed: u64,
    /// Stable hash of the canonical configuration.
    pub config_hash: String,
    /// Stable hash of the recorded series.
    pub series_hash: String,
}

/// Everything a network run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRun {
    /// Scalar summary and hashes.
    pub summary: NetworkSummary,
    /// One `power.<label>` series per actor, `steps + 1` samples each.
    pub trajectory: TrajectoryRecorder,
}

/// Integrates the network for `config.steps` updates.
pub fn simulate(config: &NetworkConfig) -> Result<NetworkRun, QfError> {
    config.validate()?;
    let n = config.actor_count();
    let seed = config.seed_policy.master_seed;
    let noise = Normal::new(0.0, config.noise).map_err(|err| {
        QfError::Network(
            ErrorInfo::new("invalid-noise", err.to_string()).with_context("noise", config.noise),
        )
    })?;
    let mut rng = RngHandle::from_seed(network_seed(seed));
    info!(actors = n, steps = config.steps, dt = config.dt, seed, "starting network run");

    let labels: Vec<String> = config
        .actors
        .iter()
        .map(|actor| format!("power.{}", actor.label))
        .collect();
    let mut power: Vec<f64> = config.actors.iter().map(|actor| actor.initial).collect();
    let mut peaks: Vec<PeakPower> = power
        .iter()
        .map(|&value| PeakPower { step: 0, value })
        .collect();
    let mut recorder = TrajectoryRecorder::new();
    record(&mut recorder, &labels, &power, 0)?;

    let mut increment = vec![0.0; n];
    for step in 0..config.steps {
        let t = step as f64 * config.dt;
        for (a, slot) in increment.iter_mut().enumerate() {
            let phi = power[a];
            let coupling: f64 = config.interactions[a]
                .iter()
                .zip(&power)
                .enumerate()
                .filter(|&(b, _)| b != a)
                .map(|(_, (weight, other))| weight * other)
                .sum();
            let xi = if config.noise > 0.0 {
                rng.sample(noise)
            } else {
                0.0
            };
            *slot = config.dt * (-config.lambda * phi * (phi * phi - 1.0) + coupling + xi);
        }
        for forcing in &config.forcings {
            increment[forcing.actor] += config.dt * forcing.gain * forcing.schedule.value(t);
        }
        for (phi, delta) in power.iter_mut().zip(&increment) {
            *phi += delta;
            if let Some(floor) = config.floor {
                *phi = phi.max(floor);
            }
        }
        for anchor in config.anchors.iter().filter(|anchor| anchor.step == step) {
            for (phi, target) in power.iter_mut().zip(&anchor.target) {
                *phi = (1.0 - anchor.weight) * *phi + anchor.weight * target;
            }
            debug!(step, weight = anchor.weight, "anchor applied");
        }

        let completed = step + 1;
        for (peak, &value) in peaks.iter_mut().zip(&power) {
            if value > peak.value {
                *peak = PeakPower {
                    step: completed,
                    value,
                };
            }
        }
        record(&mut recorder, &labels, &power, completed)?;
    }

    let series: Vec<_> = recorder.all_series().collect();
    let summary = NetworkSummary {
        steps: config.steps,
        final_time: config.steps as f64 * config.dt,
        final_power: config
            .actors
            .iter()
            .zip(&power)
            .map(|(actor, &value)| (actor.label.clone(), value))
            .collect(),
        peak_power: config
            .actors
            .iter()
            .zip(&peaks)
            .map(|(actor, &peak)| (actor.label.clone(), peak))
            .collect(),
        seed,
        config_hash: stable_hash_string(config)?,
        series_hash: stable_hash_string(&series)?,
    };
    info!(series_hash = %summary.series_hash, "network run finished");
    Ok(NetworkRun {
        summary,
        trajectory: recorder,
    })
}

fn record(
    recorder: &mut TrajectoryRecorder,
    labels: &[String],
    power: &[f64],
    step: usize,
) -> Result<(), QfError> {
    for (label, &value) in labels.iter().zip(power) {
        recorder.record_scalar(label, value, step)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActorConfig, Anchor};

    fn pair() -> NetworkConfig {
        NetworkConfig {
            actors: vec![
                ActorConfig {
                    label: "a".to_string(),
                    initial: 0.5,
                },
                ActorConfig {
                    label: "b".to_string(),
                    initial: 0.0,
                },
            ],
            interactions: vec![vec![9.0, 0.0], vec![1.0, 9.0]],
            noise: 0.0,
            steps: 1,
            forcings: Vec::new(),
            anchors: Vec::new(),
            ..NetworkConfig::dissolution()
        }
    }

    #[test]
    fn single_update_matches_hand_computation() {
        let run = simulate(&pair()).unwrap();
        let a = run.trajectory.series("power.a").unwrap();
        let b = run.trajectory.series("power.b").unwrap();
        // diagonal entries are ignored
        let expected_a = 0.5 + 0.1 * (-0.5 * 0.5 * (0.25 - 1.0));
        let expected_b = 0.0 + 0.1 * (1.0 * 0.5);
        assert!((a.values[1] - expected_a).abs() < 1e-12);
        assert!((b.values[1] - expected_b).abs() < 1e-12);
        assert_eq!(a.steps, vec![0, 1]);
    }

    #[test]
    fn anchor_blends_toward_target() {
        let mut config = pair();
        config.lambda = 0.0;
        config.interactions = vec![vec![0.0; 2]; 2];
        config.anchors = vec![Anchor {
            step: 0,
            weight: 0.25,
            target: vec![1.0, 1.0],
        }];
        let run = simulate(&config).unwrap();
        assert!((run.summary.final_power["a"] - 0.625).abs() < 1e-12);
        assert!((run.summary.final_power["b"] - 0.25).abs() < 1e-12);
        assert_eq!(run.summary.peak_power["a"].step, 1);
    }

    #[test]
    fn floor_clamps_negative_power() {
        let mut config = pair();
        config.lambda = 0.0;
        config.interactions = vec![vec![0.0, -100.0], vec![-100.0, 0.0]];
        config.actors[1].initial = 1.0;
        let run = simulate(&config).unwrap();
        assert_eq!(run.summary.final_power["a"], 0.0);
    }
}

//! Network configuration and the built-in dissolution scenario.

use std::collections::BTreeSet;

use qf_core::errors::{ErrorInfo, QfError};
use qf_run::SeedPolicy;
use serde::{Deserialize, Serialize};

use crate::schedule::{Schedule, Segment};

fn network_error(code: &str, message: impl Into<String>) -> QfError {
    QfError::Network(ErrorInfo::new(code, message))
}

/// One actor of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Name used for the `power.<label>` series.
    pub label: String,
    /// Power at step 0.
    pub initial: f64,
}

/// External forcing `gain * schedule(t)` added to one actor's increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forcing {
    /// Index of the forced actor.
    pub actor: usize,
    /// Multiplier applied to the schedule.
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Time profile of the forcing.
    pub schedule: Schedule,
}

fn default_gain() -> f64 {
    1.0
}

/// Blend `phi <- (1 - weight) phi + weight target` applied right after the
/// update that leaves step `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Update index after which the blend is applied.
    pub step: usize,
    /// Blend weight in `[0, 1]`.
    pub weight: f64,
    /// Target power per actor.
    pub target: Vec<f64>,
}

/// Immutable description of a network run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Actors in matrix order.
    pub actors: Vec<ActorConfig>,
    /// Square interaction matrix `A`; the diagonal is ignored.
    pub interactions: Vec<Vec<f64>>,
    /// Double-well strength `lambda` of `-lambda phi (phi^2 - 1)`.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Time step.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Number of Euler updates.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Standard deviation of the Gaussian noise term.
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Lower bound applied after every update; unbounded when absent.
    #[serde(default = "default_floor")]
    pub floor: Option<f64>,
    /// Scheduled external forcings.
    #[serde(default)]
    pub forcings: Vec<Forcing>,
    /// Scheduled blends toward target states.
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    /// Master seed for the noise.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_lambda() -> f64 {
    0.5
}

fn default_dt() -> f64 {
    0.1
}

fn default_steps() -> usize {
    199
}

fn default_noise() -> f64 {
    0.005
}

fn default_floor() -> Option<f64> {
    Some(0.0)
}

impl NetworkConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(data: &str) -> Result<Self, QfError> {
        qf_run::serde::from_yaml_str(data)
    }

    /// Number of actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Checks shapes and ranges before a run.
    pub fn validate(&self) -> Result<(), QfError> {
        let n = self.actors.len();
        if n == 0 {
            return Err(network_error("no-actors", "a network needs at least one actor"));
        }
        let mut labels = BTreeSet::new();
        for actor in &self.actors {
            if !labels.insert(actor.label.as_str()) {
                return Err(QfError::Network(
                    ErrorInfo::new("duplicate-label", "actor labels must be unique")
                        .with_context("label", &actor.label),
                ));
            }
            if !actor.initial.is_finite() {
                return Err(QfError::Network(
                    ErrorInfo::new("invalid-initial", "initial power must be finite")
                        .with_context("label", &actor.label),
                ));
            }
        }
        if self.interactions.len() != n || self.interactions.iter().any(|row| row.len() != n) {
            return Err(QfError::Network(
                ErrorInfo::new("matrix-shape", "interaction matrix must be square")
                    .with_context("actors", n)
                    .with_context("rows", self.interactions.len()),
            ));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(QfError::Network(
                ErrorInfo::new("invalid-dt", "time step must be positive and finite")
                    .with_context("dt", self.dt),
            ));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(QfError::Network(
                ErrorInfo::new("invalid-noise", "noise must be a non-negative deviation")
                    .with_context("noise", self.noise),
            ));
        }
        for (index, forcing) in self.forcings.iter().enumerate() {
            if forcing.actor >= n {
                return Err(QfError::Network(
                    ErrorInfo::new("unknown-actor", "forcing targets a missing actor")
                        .with_context("forcing", index)
                        .with_context("actor", forcing.actor),
                ));
            }
            forcing.schedule.validate()?;
        }
        for (index, anchor) in self.anchors.iter().enumerate() {
            if anchor.target.len() != n {
                return Err(QfError::Network(
                    ErrorInfo::new("anchor-shape", "anchor target must list every actor")
                        .with_context("anchor", index)
                        .with_context("expected", n)
                        .with_context("found", anchor.target.len()),
                ));
            }
            if !(0.0..=1.0).contains(&anchor.weight) {
                return Err(QfError::Network(
                    ErrorInfo::new("anchor-weight", "anchor weight must lie in [0, 1]")
                        .with_context("anchor", index)
                        .with_context("weight", anchor.weight),
                ));
            }
            if anchor.step >= self.steps {
                return Err(QfError::Network(
                    ErrorInfo::new("anchor-step", "anchor lies beyond the last update")
                        .with_context("anchor", index)
                        .with_context("step", anchor.step),
                ));
            }
        }
        Ok(())
    }

    /// Names of the built-in presets.
    pub fn preset_names() -> &'static [&'static str] {
        &["dissolution"]
    }

    /// Looks up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self, QfError> {
        match name {
            "dissolution" => Ok(Self::dissolution()),
            other => Err(QfError::Config(
                ErrorInfo::new("unknown-preset", "no network preset with this name")
                    .with_context("name", other)
                    .with_hint(Self::preset_names().join(", ")),
            )),
        }
    }

    /// Six actors over ten model years: a fiscal collapse of the central
    /// government, a brief conservative surge, and anchors at the two
    /// turning points.
    pub fn dissolution() -> Self {
        let actor = |label: &str, initial: f64| ActorConfig {
            label: label.to_string(),
            initial,
        };
        let schedule = |segments: Vec<Segment>| Schedule::from(segments);
        Self {
            actors: vec![
                actor("government", 1.0),
                actor("federation", 0.1),
                actor("eastern_europe", 0.15),
                actor("usa", 0.2),
                actor("military", 0.15),
                actor("conservatives", 0.1),
            ],
            interactions: vec![
                vec![-0.3, -0.8, -0.7, -1.0, 0.2, -0.3],
                vec![-0.8, 0.2, 0.3, 0.2, 0.0, -0.1],
                vec![-0.7, 0.3, 0.1, 0.4, -0.2, -0.1],
                vec![-1.0, 0.2, 0.4, 0.2, 0.1, -0.4],
                vec![0.2, 0.0, -0.2, 0.1, 0.0, -0.3],
                vec![-0.3, -0.1, -0.1, -0.4, -0.3, 0.1],
            ],
            lambda: default_lambda(),
            dt: default_dt(),
            steps: default_steps(),
            noise: default_noise(),
            floor: default_floor(),
            forcings: vec![
                Forcing {
                    actor: 0,
                    gain: 0.3,
                    schedule: schedule(vec![
                        Segment {
                            start: 0.0,
                            end: Some(5.0),
                            offset: 0.0,
                            slope: -0.1,
                        },
                        Segment {
                            start: 5.0,
                            end: Some(10.0),
                            offset: -0.5,
                            slope: -0.5,
                        },
                        Segment {
                            start: 10.0,
                            end: Some(15.0),
                            offset: -0.75,
                            slope: -0.5,
                        },
                        Segment::constant(15.0, None, -1.0),
                    ]),
                },
                Forcing {
                    actor: 5,
                    gain: 0.5,
                    schedule: schedule(vec![Segment::constant(14.0, Some(15.5), 2.0)]),
                },
                Forcing {
                    actor: 1,
                    gain: 1.0,
                    schedule: schedule(vec![Segment::constant(15.0, Some(20.0), 0.3)]),
                },
                Forcing {
                    actor: 2,
                    gain: 1.0,
                    schedule: schedule(vec![Segment::constant(5.0, None, 0.03)]),
                },
                Forcing {
                    actor: 3,
                    gain: 1.0,
                    schedule: schedule(vec![Segment::constant(5.0, None, 0.04)]),
                },
            ],
            anchors: vec![
                Anchor {
                    step: 50,
                    weight: 0.1,
                    target: vec![0.65, 0.25, 0.30, 0.45, 0.20, 0.15],
                },
                Anchor {
                    step: 150,
                    weight: 0.2,
                    target: vec![0.02, 0.60, 0.50, 0.70, 0.10, 0.05],
                },
            ],
            seed_policy: SeedPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dissolution_preset_is_valid() {
        let config = NetworkConfig::dissolution();
        config.validate().unwrap();
        assert_eq!(config.actor_count(), 6);
        let fiscal = &config.forcings[0].schedule;
        assert!((fiscal.value(2.0) + 0.2).abs() < 1e-12);
        assert!((fiscal.value(7.0) + 1.5).abs() < 1e-12);
        assert_eq!(fiscal.value(16.0), -1.0);
    }

    #[test]
    fn shape_errors_are_reported() {
        let mut config = NetworkConfig::dissolution();
        config.interactions.pop();
        assert_eq!(config.validate().unwrap_err().code(), "matrix-shape");

        let mut config = NetworkConfig::dissolution();
        config.anchors[0].target.pop();
        assert_eq!(config.validate().unwrap_err().code(), "anchor-shape");

        let mut config = NetworkConfig::dissolution();
        config.forcings[0].actor = 6;
        assert_eq!(config.validate().unwrap_err().code(), "unknown-actor");

        let mut config = NetworkConfig::dissolution();
        config.noise = -1.0;
        assert_eq!(config.validate().unwrap_err().code(), "invalid-noise");
    }

    #[test]
    fn sparse_yaml_uses_defaults() {
        let yaml = r#"
actors:
  - { label: a, initial: 0.5 }
  - { label: b, initial: 0.2 }
interactions: [[0.0, 0.1], [0.1, 0.0]]
"#;
        let config = NetworkConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.lambda, 0.5);
        assert_eq!(config.floor, Some(0.0));
        assert!(config.forcings.is_empty());
        config.validate().unwrap();
    }
}

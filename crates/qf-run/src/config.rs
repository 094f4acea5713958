use std::collections::BTreeSet;

use qf_core::errors::{ErrorInfo, QfError};
use qf_core::{Grid, GridSpec, RngHandle};
use qf_diag::{profile_distance_fits, validate_window};
use qf_lattice::{
    Coefficient, Coupling, Drive, FieldModel, InitialCondition, LatticeState, Profile, Scheme,
    SelfPotential,
};
use serde::{Deserialize, Serialize};

use crate::determinism;

fn config_error(code: &str, message: impl Into<String>) -> QfError {
    QfError::Config(ErrorInfo::new(code, message))
}

/// Immutable description of one lattice run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Periodic grid.
    #[serde(default = "default_grid")]
    pub grid: GridSpec,
    /// Time step and step count.
    #[serde(default)]
    pub time: TimeConfig,
    /// One or two evolved fields, in model order.
    #[serde(default = "default_components")]
    pub components: Vec<ComponentConfig>,
    /// Interaction between the two fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling: Option<Coupling>,
    /// Update convention.
    #[serde(default)]
    pub scheme: Scheme,
    /// Correlation window and profile settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Recording cadences.
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Master seed.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_grid() -> GridSpec {
    GridSpec {
        points: 100,
        length: 10.0,
    }
}

fn default_components() -> Vec<ComponentConfig> {
    vec![ComponentConfig {
        label: "phi".to_string(),
        potential: SelfPotential::quartic(1.0, 0.1),
        initial: InitialCondition::at_rest(Profile::centered_gaussian(1.0, 0.5)),
    }]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            time: TimeConfig::default(),
            components: default_components(),
            coupling: None,
            scheme: Scheme::default(),
            diagnostics: DiagnosticsConfig::default(),
            sampling: SamplingConfig::default(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

/// Time discretisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Time step `dt`.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Number of steps `T`.
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_dt() -> f64 {
    0.01
}

fn default_steps() -> usize {
    1000
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            steps: default_steps(),
        }
    }
}

/// One evolved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Name used for the recorded series (`mean.<label>`, ...).
    pub label: String,
    /// On-site potential.
    #[serde(default)]
    pub potential: SelfPotential,
    /// Initial field and momentum.
    #[serde(default)]
    pub initial: InitialCondition,
}

/// Correlation diagnostics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Sliding window length `w` for the windowed mutual correlation.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Stride between default profile distances.
    #[serde(default = "default_profile_stride")]
    pub profile_stride: usize,
    /// Explicit profile distances; defaults to `1, 1 + stride, ... <= N - w`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_distances: Option<Vec<usize>>,
}

fn default_window_size() -> usize {
    10
}

fn default_profile_stride() -> usize {
    10
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            profile_stride: default_profile_stride(),
            profile_distances: None,
        }
    }
}

/// Recording cadences, in completed steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Snapshot every this many steps (0 disables snapshots).
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: usize,
    /// Scalar series sample every this many steps.
    #[serde(default = "default_scalar_interval")]
    pub scalar_interval: usize,
}

fn default_snapshot_interval() -> usize {
    200
}

fn default_scalar_interval() -> usize {
    1
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: default_snapshot_interval(),
            scalar_interval: default_scalar_interval(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl RunConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(data: &str) -> Result<Self, QfError> {
        crate::serde::from_yaml_str(data)
    }

    /// Validated grid.
    pub fn grid(&self) -> Result<Grid, QfError> {
        Grid::try_from(self.grid)
    }

    /// Checks every parameter that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<(), QfError> {
        let grid = self.grid()?;
        if self.time.steps == 0 {
            return Err(config_error("no-steps", "a run needs at least one step"));
        }
        let mut labels = BTreeSet::new();
        for component in &self.components {
            if component.label.trim().is_empty() {
                return Err(config_error("empty-label", "component labels must be non-empty"));
            }
            if !labels.insert(component.label.as_str()) {
                return Err(QfError::Config(
                    ErrorInfo::new("duplicate-label", "component labels must be unique")
                        .with_context("label", &component.label),
                ));
            }
        }
        if self.sampling.scalar_interval == 0 {
            return Err(config_error(
                "invalid-cadence",
                "scalar interval must be at least one step",
            ));
        }
        validate_window(grid.points(), self.diagnostics.window_size)?;
        if let Some(distances) = &self.diagnostics.profile_distances {
            let window = self.diagnostics.window_size;
            if let Some(&distance) = distances
                .iter()
                .find(|&&d| !profile_distance_fits(grid.points(), window, d))
            {
                return Err(QfError::Config(
                    ErrorInfo::new(
                        "profile-out-of-range",
                        "profile distance plus window exceeds the grid",
                    )
                    .with_context("distance", distance)
                    .with_context("window", window)
                    .with_context("points", grid.points()),
                ));
            }
        }
        self.build_model().map(|_| ())
    }

    /// Assembles the immutable model.
    pub fn build_model(&self) -> Result<FieldModel, QfError> {
        FieldModel::new(
            self.grid()?,
            self.time.dt,
            self.components.iter().map(|c| c.potential).collect(),
            self.coupling,
            self.scheme,
        )
    }

    /// Samples every component's initial condition, drawing jitter from a
    /// per-component substream of the master seed.
    pub fn initial_state(&self, grid: &Grid) -> Result<LatticeState, QfError> {
        let components = self
            .components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let mut rng = RngHandle::from_seed(determinism::component_seed(
                    self.seed_policy.master_seed,
                    index,
                ));
                component.initial.build(grid, &mut rng)
            })
            .collect::<Result<Vec<_>, _>>()?;
        LatticeState::new(components)
    }

    /// Profile distances, explicit or derived from the stride.
    pub fn profile_distances(&self) -> Vec<usize> {
        match &self.diagnostics.profile_distances {
            Some(distances) => distances.clone(),
            None => qf_diag::default_profile_distances(
                self.grid.points,
                self.diagnostics.window_size,
                self.diagnostics.profile_stride,
            ),
        }
    }

    /// Names of the built-in presets.
    pub fn preset_names() -> &'static [&'static str] {
        &["single", "social", "driven"]
    }

    /// Looks up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self, QfError> {
        match name {
            "single" => Ok(Self::single()),
            "social" => Ok(Self::social()),
            "driven" => Ok(Self::driven()),
            other => Err(QfError::Config(
                ErrorInfo::new("unknown-preset", "no preset with this name")
                    .with_context("name", other)
                    .with_hint(Self::preset_names().join(", ")),
            )),
        }
    }

    /// Single massive quartic field released from a Gaussian bump.
    pub fn single() -> Self {
        Self::default()
    }

    /// Opinion field `phi` coupled cubically to a sinusoidal sentiment field `psi`.
    pub fn social() -> Self {
        Self {
            components: vec![
                ComponentConfig {
                    label: "phi".to_string(),
                    potential: SelfPotential::quartic(1.0, 0.1),
                    initial: InitialCondition::at_rest(Profile::centered_gaussian(1.0, 0.5)),
                },
                ComponentConfig {
                    label: "psi".to_string(),
                    potential: SelfPotential::quartic(1.0, 0.1),
                    initial: InitialCondition::at_rest(Profile::Sine {
                        amplitude: 0.1,
                        modes: 1.0,
                    }),
                },
            ],
            coupling: Some(Coupling::cubic(0.5)),
            ..Self::default()
        }
    }

    /// Driven double well with a slowly modulated self coupling, started
    /// from a central plateau.
    pub fn driven() -> Self {
        let potential = SelfPotential::double_well(
            Coefficient::Modulated {
                base: 0.1,
                depth: 0.2,
                frequency: 0.05,
            },
            1.0,
        )
        .with_drive(Drive {
            amplitude: 0.05,
            frequency: 0.1,
        });
        Self {
            grid: GridSpec {
                points: 100,
                length: 100.0,
            },
            time: TimeConfig {
                dt: 0.05,
                steps: 300,
            },
            components: vec![ComponentConfig {
                label: "phi".to_string(),
                potential,
                initial: InitialCondition::at_rest(Profile::Plateau {
                    value: 1.5,
                    half_width: 5,
                }),
            }],
            ..Self::default()
        }
    }
}

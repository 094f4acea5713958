use std::collections::BTreeMap;

use qf_core::errors::{ErrorInfo, QfError};
use qf_diag::{
    spatial_correlation, spatial_correlation_profile, total_energy, windowed_mutual_correlation,
    ProfilePoint,
};
use qf_lattice::{FieldModel, Integrator, LatticeState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::hash::stable_hash_string;
use crate::recorder::{Cadence, TrajectoryRecorder};

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Completed steps.
    pub steps: usize,
    /// Simulation time at the end of the run.
    pub final_time: f64,
    /// Total energy of the initial state.
    pub initial_energy: f64,
    /// Total energy of the final state.
    pub final_energy: f64,
    /// `|E_final - E_initial| / |E_initial|`, zero for a zero-energy start.
    pub relative_energy_drift: f64,
    /// Mean field per component label before the first step.
    pub initial_means: BTreeMap<String, f64>,
    /// Mean field per component label after the last step.
    pub final_means: BTreeMap<String, f64>,
    /// Time average of the windowed mutual correlation series.
    pub mean_correlation: f64,
    /// `dt * omega_max` estimated from the initial amplitude.
    pub courant_number: f64,
    /// Whether every field and momentum value stayed finite.
    pub finite: bool,
    /// Number of snapshots taken.
    pub snapshot_count: usize,
    /// Master seed of the run.
    pub seed: u64,
    /// Stable hash of the canonical configuration.
    pub config_hash: String,
    /// Stable hash of every recorded scalar series.
    pub series_hash: String,
}

impl RunSummary {
    /// Fails when the run produced non-finite values.
    pub fn ensure_finite(&self) -> Result<(), QfError> {
        if self.finite && self.final_energy.is_finite() {
            return Ok(());
        }
        Err(QfError::Model(
            ErrorInfo::new("non-finite-state", "the run produced non-finite values")
                .with_context("steps", self.steps)
                .with_context("courant_number", self.courant_number)
                .with_hint("reduce dt or the initial amplitude"),
        ))
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifacts {
    /// Scalar summary and hashes.
    pub summary: RunSummary,
    /// Snapshots and per-step series.
    pub trajectory: TrajectoryRecorder,
    /// Spatial correlation profile of the first component at the final time.
    pub profile: Vec<ProfilePoint>,
    /// Final fields and momenta.
    pub final_state: LatticeState,
}

/// Runs the configured simulation from its initial condition.
pub fn run(config: &RunConfig) -> Result<RunArtifacts, QfError> {
    config.validate()?;
    let model = config.build_model()?;
    let mut state = config.initial_state(model.grid())?;
    let seed = config.seed_policy.master_seed;
    let steps = config.time.steps;
    let dt = model.dt();

    let amplitude = state
        .components
        .iter()
        .flat_map(|c| c.field.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let courant_number = model.courant_number(amplitude);
    info!(
        points = model.grid().points(),
        components = model.components(),
        steps,
        dt,
        seed,
        courant_number,
        "starting lattice run"
    );

    let snapshot_cadence = Cadence::every(config.sampling.snapshot_interval);
    let scalar_cadence = Cadence::every(config.sampling.scalar_interval);
    let mut recorder = TrajectoryRecorder::new();

    let initial_energy = total_energy(&state, &model, 0.0)?;
    let initial_means = means(config, &state);
    if snapshot_cadence.due(0) {
        recorder.record_snapshot(&state, 0, 0.0);
    }

    let mut integrator = Integrator::new(&model);
    for step in 0..steps {
        integrator.step(&mut state, step as f64 * dt)?;
        let completed = step + 1;
        let time = completed as f64 * dt;
        if scalar_cadence.due(completed) {
            record_scalars(config, &model, &state, completed, time, &mut recorder)?;
        }
        if snapshot_cadence.due(completed) {
            recorder.record_snapshot(&state, completed, time);
            debug!(
                step = completed,
                time,
                energy = recorder.series("energy").and_then(|s| s.last()),
                "snapshot recorded"
            );
        }
    }

    let final_time = steps as f64 * dt;
    let final_energy = total_energy(&state, &model, final_time)?;
    let finite = state.is_finite();
    if !finite {
        warn!(courant_number, "lattice run produced non-finite values");
    }

    let window = config.diagnostics.window_size;
    let lead = &state.components[0];
    let profile = spatial_correlation_profile(
        &lead.field,
        &lead.momentum,
        model.dx(),
        final_time,
        model.potential(0),
        window,
        &config.profile_distances(),
    )?;

    let mean_correlation = recorder
        .series("correlation")
        .filter(|s| !s.is_empty())
        .map(|s| s.values.iter().sum::<f64>() / s.len() as f64)
        .unwrap_or(0.0);
    let relative_energy_drift = if initial_energy != 0.0 {
        (final_energy - initial_energy).abs() / initial_energy.abs()
    } else {
        0.0
    };
    let series: Vec<_> = recorder.all_series().collect();
    let summary = RunSummary {
        steps,
        final_time,
        initial_energy,
        final_energy,
        relative_energy_drift,
        initial_means,
        final_means: means(config, &state),
        mean_correlation,
        courant_number,
        finite,
        snapshot_count: recorder.snapshots().len(),
        seed,
        config_hash: stable_hash_string(config)?,
        series_hash: stable_hash_string(&series)?,
    };
    info!(
        final_energy,
        relative_energy_drift,
        series_hash = %summary.series_hash,
        "lattice run finished"
    );

    Ok(RunArtifacts {
        summary,
        trajectory: recorder,
        profile,
        final_state: state,
    })
}

fn means(config: &RunConfig, state: &LatticeState) -> BTreeMap<String, f64> {
    config
        .components
        .iter()
        .zip(&state.components)
        .map(|(c, component)| (c.label.clone(), component.mean()))
        .collect()
}

fn record_scalars(
    config: &RunConfig,
    model: &FieldModel,
    state: &LatticeState,
    step: usize,
    time: f64,
    recorder: &mut TrajectoryRecorder,
) -> Result<(), QfError> {
    for (component_config, component) in config.components.iter().zip(&state.components) {
        let label = &component_config.label;
        recorder.record_scalar(&format!("mean.{label}"), component.mean(), step)?;
        recorder.record_scalar(
            &format!("spatial_correlation.{label}"),
            spatial_correlation(&component.field).value(),
            step,
        )?;
    }
    recorder.record_scalar("energy", total_energy(state, model, time)?, step)?;
    let lead = &state.components[0];
    let correlation = windowed_mutual_correlation(
        &lead.field,
        &lead.momentum,
        model.dx(),
        time,
        model.potential(0),
        config.diagnostics.window_size,
    );
    recorder.record_scalar("correlation", correlation.mean, step)
}

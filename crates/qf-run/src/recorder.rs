use indexmap::IndexMap;
use qf_core::errors::{ErrorInfo, QfError};
use qf_lattice::LatticeState;
use serde::{Deserialize, Serialize};

/// Deep copy of the fields and momenta after a completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of completed steps.
    pub step: usize,
    /// Simulation time `step * dt`.
    pub time: f64,
    /// Field values per component.
    pub fields: Vec<Vec<f64>>,
    /// Momenta per component.
    pub momenta: Vec<Vec<f64>>,
}

impl Snapshot {
    /// Copies `state` out.
    pub fn capture(state: &LatticeState, step: usize, time: f64) -> Self {
        Self {
            step,
            time,
            fields: state.components.iter().map(|c| c.field.clone()).collect(),
            momenta: state.components.iter().map(|c| c.momentum.clone()).collect(),
        }
    }
}

/// Named scalar time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSeries {
    /// Series name, e.g. `energy` or `mean.phi`.
    pub name: String,
    /// Step index of each sample, non-decreasing.
    pub steps: Vec<usize>,
    /// Sampled values.
    pub values: Vec<f64>,
}

impl DiagnosticSeries {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent value.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Decides which steps are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    /// Sample when `step % interval == 0`; zero never samples.
    pub interval: usize,
}

impl Cadence {
    /// Cadence sampling every `interval` steps.
    pub fn every(interval: usize) -> Self {
        Self { interval }
    }

    /// Cadence that never samples.
    pub fn disabled() -> Self {
        Self { interval: 0 }
    }

    /// Whether `step` is due.
    pub fn due(&self, step: usize) -> bool {
        self.interval > 0 && step % self.interval == 0
    }
}

/// Accumulates snapshots and scalar series over a run.
///
/// Series keep their first-insertion order so exports list them the same
/// way on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecorder {
    snapshots: Vec<Snapshot>,
    series: IndexMap<String, DiagnosticSeries>,
}

impl TrajectoryRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a deep copy of `state`.
    pub fn record_snapshot(&mut self, state: &LatticeState, step: usize, time: f64) {
        self.snapshots.push(Snapshot::capture(state, step, time));
    }

    /// Appends `value` to the series `name`, creating it on first use.
    ///
    /// A step lower than the last recorded step of that series is rejected.
    pub fn record_scalar(&mut self, name: &str, value: f64, step: usize) -> Result<(), QfError> {
        let series = self
            .series
            .entry(name.to_string())
            .or_insert_with(|| DiagnosticSeries::new(name));
        if let Some(&last) = series.steps.last() {
            if step < last {
                return Err(QfError::Diagnostics(
                    ErrorInfo::new("step-out-of-order", "series steps must not decrease")
                        .with_context("series", name)
                        .with_context("last", last)
                        .with_context("step", step),
                ));
            }
        }
        series.steps.push(step);
        series.values.push(value);
        Ok(())
    }

    /// Recorded snapshots in order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Looks up a series by name.
    pub fn series(&self, name: &str) -> Option<&DiagnosticSeries> {
        self.series.get(name)
    }

    /// Iterates over the series in insertion order.
    pub fn all_series(&self) -> impl Iterator<Item = &DiagnosticSeries> {
        self.series.values()
    }

    /// Number of distinct series.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qf_lattice::Component;

    #[test]
    fn snapshots_are_deep_copies() {
        let mut state = LatticeState::new(vec![Component::at_rest(vec![1.0, 2.0, 3.0])]).unwrap();
        let mut recorder = TrajectoryRecorder::new();
        recorder.record_snapshot(&state, 0, 0.0);
        state.components[0].field[0] = 9.0;
        assert_eq!(recorder.snapshots()[0].fields[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn series_keep_insertion_order_and_reject_rewinds() {
        let mut recorder = TrajectoryRecorder::new();
        recorder.record_scalar("energy", 1.0, 1).unwrap();
        recorder.record_scalar("mean.phi", 0.5, 1).unwrap();
        recorder.record_scalar("energy", 1.1, 2).unwrap();
        let names: Vec<_> = recorder.all_series().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["energy", "mean.phi"]);
        let err = recorder.record_scalar("energy", 0.9, 1).unwrap_err();
        assert_eq!(err.code(), "step-out-of-order");
        assert_eq!(recorder.series("energy").unwrap().len(), 2);
    }

    #[test]
    fn cadence_selects_multiples() {
        let cadence = Cadence::every(200);
        assert!(cadence.due(0));
        assert!(!cadence.due(199));
        assert!(cadence.due(400));
        assert!(!Cadence::disabled().due(0));
    }
}

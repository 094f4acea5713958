#![deny(missing_docs)]

//! Deterministic driver that wires the lattice integrator, the diagnostics
//! and the trajectory recorder together.

/// YAML configuration schema, defaults and presets.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Stable hashing of serializable payloads.
pub mod hash;
/// Run loop and summary.
pub mod kernel;
/// Snapshot and scalar-series accumulation.
pub mod recorder;
/// Canonical JSON and YAML helpers.
pub mod serde;

pub use config::{
    ComponentConfig, DiagnosticsConfig, RunConfig, SamplingConfig, SeedPolicy, TimeConfig,
};
pub use kernel::{run, RunArtifacts, RunSummary};
pub use recorder::{Cadence, DiagnosticSeries, Snapshot, TrajectoryRecorder};

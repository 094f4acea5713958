use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use qf_core::{RunProvenance, SchemaVersion};
use qf_diag::ProfilePoint;
use qf_run::recorder::{Snapshot, TrajectoryRecorder};
use serde::{Deserialize, Serialize};

/// Layout version of the exported directory.
pub const EXPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Describes the files written for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Layout version.
    pub schema_version: SchemaVersion,
    /// `lattice` or `network`.
    pub kind: String,
    /// Hashes, seed and tool versions.
    pub provenance: RunProvenance,
    /// Files written, relative to the output directory.
    pub files: Vec<PathBuf>,
}

impl ExportManifest {
    pub fn new(kind: &str, config_hash: &str, series_hash: &str, seed: u64) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("qf-sim".to_string(), env!("CARGO_PKG_VERSION").to_string());
        Self {
            schema_version: EXPORT_SCHEMA,
            kind: kind.to_string(),
            provenance: RunProvenance {
                config_hash: config_hash.to_string(),
                series_hash: series_hash.to_string(),
                seed,
                tool_versions,
            },
            files: Vec::new(),
        }
    }
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes every scalar series in long form: `series,step,value`.
pub fn write_series_csv(path: &Path, recorder: &TrajectoryRecorder) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["series", "step", "value"])?;
    for series in recorder.all_series() {
        for (step, value) in series.steps.iter().zip(&series.values) {
            writer.write_record([series.name.clone(), step.to_string(), value.to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_profile_csv(
    path: &Path,
    profile: &[ProfilePoint],
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["distance", "correlation"])?;
    for point in profile {
        writer.write_record([point.distance.to_string(), point.correlation.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_snapshots_json(path: &Path, snapshots: &[Snapshot]) -> Result<(), Box<dyn Error>> {
    write_json(path, &snapshots)
}

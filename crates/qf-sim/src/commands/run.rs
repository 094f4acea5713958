use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use qf_run::serde::{to_canonical_json_bytes, to_yaml_string};
use qf_run::{run as run_lattice, RunArtifacts, RunConfig};
use tracing::info;

use crate::export::{self, ExportManifest};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML configuration describing the run.
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,
    /// Built-in scenario: single, social or driven.
    #[arg(long, default_value = "single")]
    pub preset: String,
    /// Output directory for exported artefacts.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the number of steps.
    #[arg(long)]
    pub steps: Option<usize>,
    /// Override the master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Fail when the run produced non-finite values.
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    let artifacts = run_lattice(&config)?;
    if args.strict {
        artifacts.summary.ensure_finite()?;
    }
    let manifest = write_artifacts(&args.out, &config, &artifacts)?;
    info!(out = %args.out.display(), files = manifest.files.len(), "lattice export written");
    let json = to_canonical_json_bytes(&artifacts.summary)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_yaml_str(&fs::read_to_string(path)?)?,
        None => RunConfig::preset(&args.preset)?,
    };
    if let Some(steps) = args.steps {
        config.time.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.seed_policy.master_seed = seed;
    }
    Ok(config)
}

pub fn write_artifacts(
    out: &Path,
    config: &RunConfig,
    artifacts: &RunArtifacts,
) -> Result<ExportManifest, Box<dyn Error>> {
    fs::create_dir_all(out)?;
    let summary = &artifacts.summary;
    let mut manifest =
        ExportManifest::new("lattice", &summary.config_hash, &summary.series_hash, summary.seed);

    fs::write(out.join("config.yaml"), to_yaml_string(config)?)?;
    export::write_series_csv(&out.join("series.csv"), &artifacts.trajectory)?;
    export::write_snapshots_json(&out.join("snapshots.json"), artifacts.trajectory.snapshots())?;
    export::write_profile_csv(&out.join("profile.csv"), &artifacts.profile)?;
    export::write_json(out.join("summary.json"), summary)?;
    manifest.files = [
        "config.yaml",
        "series.csv",
        "snapshots.json",
        "profile.csv",
        "summary.json",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    export::write_json(out.join("manifest.json"), &manifest)?;
    Ok(manifest)
}

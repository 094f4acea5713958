use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use qf_net::{simulate, NetworkConfig, NetworkRun};
use qf_run::serde::{to_canonical_json_bytes, to_yaml_string};
use tracing::info;

use crate::export::{self, ExportManifest};

#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// YAML configuration describing the network.
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,
    /// Built-in scenario.
    #[arg(long, default_value = "dissolution")]
    pub preset: String,
    /// Output directory for exported artefacts.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the master seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &NetworkArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => NetworkConfig::from_yaml_str(&fs::read_to_string(path)?)?,
        None => NetworkConfig::preset(&args.preset)?,
    };
    if let Some(seed) = args.seed {
        config.seed_policy.master_seed = seed;
    }
    let result = simulate(&config)?;
    let manifest = write_artifacts(&args.out, &config, &result)?;
    info!(out = %args.out.display(), files = manifest.files.len(), "network export written");
    let json = to_canonical_json_bytes(&result.summary)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

pub fn write_artifacts(
    out: &Path,
    config: &NetworkConfig,
    result: &NetworkRun,
) -> Result<ExportManifest, Box<dyn Error>> {
    fs::create_dir_all(out)?;
    let summary = &result.summary;
    let mut manifest =
        ExportManifest::new("network", &summary.config_hash, &summary.series_hash, summary.seed);
    fs::write(out.join("config.yaml"), to_yaml_string(config)?)?;
    export::write_series_csv(&out.join("series.csv"), &result.trajectory)?;
    export::write_json(out.join("summary.json"), summary)?;
    manifest.files = ["config.yaml", "series.csv", "summary.json"]
        .iter()
        .map(PathBuf::from)
        .collect();
    export::write_json(out.join("manifest.json"), &manifest)?;
    Ok(manifest)
}

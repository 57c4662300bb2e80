//! CLI module for saving a demo model through the store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use climaus::checkpoint::{CheckpointConfig, CheckpointStore, Metadata, VersionOrdering};
use climaus::config::load_config;
use climaus::models::{BaseModel, Linear};

/// Parameters of a demo save
pub struct DemoRequest {
    pub config: Option<PathBuf>,
    pub version: Option<String>,
    pub auto_increment: bool,
    pub seed: u64,
    pub inputs: usize,
    pub outputs: usize,
}

/// Save a seeded `Linear` model and return its version directory.
///
/// With a run config, the store root and version default to the config's
/// `output` section; explicit CLI flags still win.
pub fn run(
    base_dir: Option<&Path>,
    ordering: VersionOrdering,
    request: DemoRequest,
) -> Result<PathBuf> {
    let model = Linear::seeded(request.inputs, request.outputs, request.seed);

    let (base, root, config_version) = match &request.config {
        Some(path) => {
            let run_config = load_config(path)
                .with_context(|| format!("Invalid config '{}'", path.display()))?;
            let output = run_config.output()?;
            let base = BaseModel::from_run_config(model, &run_config)?;
            (base, output.model_dir, output.version)
        }
        None => (
            BaseModel::new(model, Metadata::new()),
            PathBuf::from(super::DEFAULT_BASE_DIR),
            None,
        ),
    };

    let root = base_dir.map(Path::to_path_buf).unwrap_or(root);
    let base = base.with_store(CheckpointStore::new(
        CheckpointConfig::new(root).ordering(ordering),
    ));
    tracing::info!(summary = %base.summary(), seed = request.seed, "Created demo model");

    let mut meta = Metadata::new();
    meta.insert("seed".into(), request.seed.into());

    let version = request
        .version
        .filter(|v| !v.is_empty())
        .or(config_version);
    let path = base
        .save_model(Some(meta), version.as_deref(), request.auto_increment)
        .context("Failed to save demo model")?;
    Ok(path)
}

//! Versioned checkpoint store: one directory per model kind, one per version.

use super::state::{Checkpointable, Metadata, META_FILE, WEIGHTS_FILE};
use super::version::{
    increment_version, latest_version, VersionOrdering, DEFAULT_VERSION, INITIAL_VERSION,
};
use crate::{ClimausError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Configuration for a checkpoint store.
#[derive(Clone, Debug)]
pub struct CheckpointConfig {
    /// Root directory holding one subdirectory per model kind
    pub base_dir: PathBuf,
    /// How version directory names are ordered when picking the latest
    pub ordering: VersionOrdering,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("models/weights"),
            ordering: VersionOrdering::default(),
        }
    }
}

impl CheckpointConfig {
    /// Create a new config rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Set the version ordering.
    pub fn ordering(mut self, ordering: VersionOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Manages versioned model checkpoints on disk.
///
/// Layout:
///
/// ```text
/// <base_dir>/<model_kind>/<version>/model.bin
/// <base_dir>/<model_kind>/<version>/meta.json
/// ```
///
/// Every call re-reads the directory listing; nothing is cached. There is no
/// locking, so concurrent saves to the same version race and the last
/// writer wins.
///
/// # Example
///
/// ```ignore
/// let store = CheckpointStore::new(CheckpointConfig::new("./models/weights"));
///
/// // After training:
/// let path = store.save(&model, &meta, None, true)?;
///
/// // To restore the newest version:
/// let meta = store.load(&mut model, None)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct CheckpointStore {
    config: CheckpointConfig,
}

impl CheckpointStore {
    /// Create a new store. No directories are created until the first save.
    pub fn new(config: CheckpointConfig) -> Self {
        Self { config }
    }

    /// Get the base directory path.
    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    /// Get the configured version ordering.
    pub fn ordering(&self) -> VersionOrdering {
        self.config.ordering
    }

    /// Directory holding every version of `model_kind`.
    pub fn model_dir(&self, model_kind: &str) -> PathBuf {
        self.config.base_dir.join(model_kind)
    }

    /// Directory holding one version of `model_kind`.
    pub fn version_dir(&self, model_kind: &str, version: &str) -> PathBuf {
        self.model_dir(model_kind).join(version)
    }

    /// List the versions saved for `model_kind`, oldest first.
    ///
    /// Only subdirectories whose name starts with `v` count as versions. A
    /// missing model directory yields an empty list.
    pub fn list_versions(&self, model_kind: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.model_dir(model_kind)) {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut versions: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with('v'))
            .collect();

        self.config.ordering.sort(&mut versions);
        Ok(versions)
    }

    /// Latest entry of an already sorted version list.
    pub fn latest_version(versions: &[String]) -> Option<&str> {
        latest_version(versions)
    }

    /// Pick the version a save should write to.
    ///
    /// An explicit `version` wins verbatim. Otherwise the latest existing
    /// version is bumped (`auto_increment`) or reused.
    fn resolve_save_version(
        existing: &[String],
        version: Option<&str>,
        auto_increment: bool,
    ) -> String {
        if let Some(v) = version {
            return v.to_string();
        }

        let latest = latest_version(existing);
        if auto_increment {
            increment_version(latest.unwrap_or(INITIAL_VERSION))
        } else {
            latest.unwrap_or(DEFAULT_VERSION).to_string()
        }
    }

    /// Save a model's weights and metadata.
    ///
    /// Returns the version directory that was written. Writing to a version
    /// that already exists overwrites its files. An empty `version` counts
    /// as no version.
    pub fn save<T: Checkpointable>(
        &self,
        model: &T,
        metadata: &Metadata,
        version: Option<&str>,
        auto_increment: bool,
    ) -> Result<PathBuf> {
        let version = version.filter(|v| !v.is_empty());
        let kind = model.model_kind();
        let existing = self.list_versions(&kind)?;
        let target = Self::resolve_save_version(&existing, version, auto_increment);

        if version.is_some() {
            tracing::info!(model = %kind, version = %target, "Saving model manually");
        } else if auto_increment {
            tracing::info!(model = %kind, version = %target, "Auto-incremented version");
        } else {
            tracing::info!(model = %kind, version = %target, "Using existing/latest version");
        }

        let path = self.version_dir(&kind, &target);
        fs::create_dir_all(&path)?;

        let data = model.save_state()?;
        fs::write(path.join(WEIGHTS_FILE), &data)?;

        let json = serde_json::to_string_pretty(metadata)?;
        fs::write(path.join(META_FILE), json)?;

        crate::success!(model = %kind, path = %path.display(), "Saved model");
        Ok(path)
    }

    /// Restore a model's weights in place and return the stored metadata.
    ///
    /// Loads `version` if given, otherwise the latest. Fails with
    /// [`ClimausError::NotFound`] when no version exists or the weights file
    /// is missing. A missing metadata file yields empty metadata.
    pub fn load<T: Checkpointable>(
        &self,
        model: &mut T,
        version: Option<&str>,
    ) -> Result<Metadata> {
        let kind = model.model_kind();
        let (target, path) = self.resolve_load_version(&kind, version)?;

        let weights = path.join(WEIGHTS_FILE);
        if !weights.is_file() {
            return Err(ClimausError::NotFound(format!(
                "Model weights not found at {}",
                weights.display()
            )));
        }

        let data = fs::read(&weights)?;
        model.load_state(&data)?;

        let meta = read_meta_file(&path)?;
        crate::success!(model = %kind, version = %target, "Loaded model");
        Ok(meta)
    }

    /// Read the metadata of a version without touching any weights.
    ///
    /// Resolves the version the same way [`load`](Self::load) does.
    pub fn read_metadata(&self, model_kind: &str, version: Option<&str>) -> Result<Metadata> {
        let (_, path) = self.resolve_load_version(model_kind, version)?;
        if !path.is_dir() {
            return Err(ClimausError::NotFound(format!(
                "Version directory not found at {}",
                path.display()
            )));
        }
        read_meta_file(&path)
    }

    fn resolve_load_version(
        &self,
        model_kind: &str,
        version: Option<&str>,
    ) -> Result<(String, PathBuf)> {
        let version = version.filter(|v| !v.is_empty());
        let versions = self.list_versions(model_kind)?;

        let target = match (version, latest_version(&versions)) {
            (_, None) => {
                let dir = self.model_dir(model_kind);
                tracing::error!(
                    model = model_kind,
                    dir = %dir.display(),
                    "No saved versions found"
                );
                return Err(ClimausError::NotFound(format!(
                    "No saved model versions found for {} in {}",
                    model_kind,
                    dir.display()
                )));
            }
            (Some(v), _) => v.to_string(),
            (None, Some(latest)) => latest.to_string(),
        };

        let path = self.version_dir(model_kind, &target);
        Ok((target, path))
    }
}

/// Read `meta.json` from a version directory, or empty metadata if absent.
fn read_meta_file(dir: &Path) -> Result<Metadata> {
    match fs::read_to_string(dir.join(META_FILE)) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Metadata::new()),
        Err(e) => Err(e.into()),
    }
}

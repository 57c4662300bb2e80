//! Run configuration loaded from YAML.
//!
//! A run config is a nested mapping with two required sections (`model`,
//! `train`) and one optional section (`output`) whose missing keys are
//! filled with defaults. Unknown sections are kept but logged.

mod schema;

pub use schema::{is_known_section, output_defaults, OUTPUT_SECTION, REQUIRED_KEYS};

use crate::{ClimausError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Typed view of the `output` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for run logs
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Base directory of the checkpoint store
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    /// Explicit version to save under, if any
    #[serde(default)]
    pub version: Option<String>,
    /// Free-form note attached to the run
    #[serde(default)]
    pub note: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("outputs/logs")
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models/weights")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            model_dir: default_model_dir(),
            version: None,
            note: String::new(),
        }
    }
}

/// Typed view of the `train` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: u64,
    pub batch_size: usize,
    pub learning_rate: f64,
}

/// A validated run configuration.
///
/// Wraps the raw YAML mapping so sections keep their file order and
/// unknown sections survive a load/save cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    root: Mapping,
}

impl RunConfig {
    /// Validate a mapping and fill in defaults.
    pub fn from_mapping(root: Mapping) -> Result<Self> {
        let mut config = Self { root };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(root) => Self::from_mapping(root),
            _ => Err(ClimausError::Config(
                "Invalid config format: must be a YAML mapping".into(),
            )),
        }
    }

    /// Check required sections and keys, then fill optional defaults.
    pub fn validate(&mut self) -> Result<()> {
        tracing::debug!("Validating config structure");

        for (section, keys) in REQUIRED_KEYS {
            let Some(value) = self.root.get(*section) else {
                return Err(ClimausError::Config(format!(
                    "Missing required section: '{section}'"
                )));
            };
            let Some(mapping) = value.as_mapping() else {
                return Err(ClimausError::Config(format!(
                    "Section '{section}' must be a mapping"
                )));
            };
            for key in *keys {
                if !mapping.contains_key(*key) {
                    return Err(ClimausError::Config(format!(
                        "Missing required key '{key}' in section '{section}'"
                    )));
                }
            }
        }

        self.fill_output_defaults()?;

        for section in self.root.keys() {
            let name = section.as_str().unwrap_or_default();
            if !is_known_section(name) {
                tracing::warn!(section = ?section, "Unknown config section");
            }
        }

        tracing::debug!("Config structure validated");
        Ok(())
    }

    fn fill_output_defaults(&mut self) -> Result<()> {
        let reset = match self.root.get(OUTPUT_SECTION) {
            None => {
                tracing::warn!(
                    section = OUTPUT_SECTION,
                    "Optional section missing, using defaults"
                );
                true
            }
            Some(Value::Null) => true,
            Some(_) => false,
        };
        if reset {
            self.root
                .insert(OUTPUT_SECTION.into(), Value::Mapping(Mapping::new()));
        }

        let Some(Value::Mapping(section)) = self.root.get_mut(OUTPUT_SECTION) else {
            return Err(ClimausError::Config(format!(
                "Section '{OUTPUT_SECTION}' must be a mapping"
            )));
        };

        for (key, default) in output_defaults() {
            if !section.contains_key(key) {
                section.insert(key.into(), default);
            }
        }
        Ok(())
    }

    /// Raw mapping of a section.
    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.root.get(name).and_then(Value::as_mapping)
    }

    /// The whole config as a mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    /// `model.name`, if it is a string.
    pub fn model_name(&self) -> Option<&str> {
        self.section("model")?.get("name")?.as_str()
    }

    /// Typed `output` section.
    pub fn output(&self) -> Result<OutputConfig> {
        match self.section(OUTPUT_SECTION) {
            Some(section) => Ok(serde_yaml::from_value(Value::Mapping(section.clone()))?),
            None => Ok(OutputConfig::default()),
        }
    }

    /// Typed `train` section.
    pub fn train(&self) -> Result<TrainConfig> {
        let section = self.section("train").ok_or_else(|| {
            ClimausError::Config("Missing required section: 'train'".into())
        })?;
        Ok(serde_yaml::from_value(Value::Mapping(section.clone()))?)
    }

    /// Convert to JSON, e.g. for embedding in checkpoint metadata.
    ///
    /// Fails if any mapping key is not a string.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.root)?)
    }
}

/// Load and validate a run config from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClimausError::NotFound(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path)?;
    tracing::info!(path = %path.display(), "Loading config");
    RunConfig::from_yaml_str(&text)
}

/// Write a run config as YAML, creating parent directories.
pub fn save_config(config: &RunConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let text = serde_yaml::to_string(config.as_mapping())?;
    fs::write(path, text)?;

    tracing::info!(path = %path.display(), "Config saved");
    Ok(())
}

//! Model wrappers built on top of the checkpoint store.

mod linear;

pub use linear::Linear;

use crate::checkpoint::{CheckpointConfig, CheckpointStore, Checkpointable, Metadata};
use crate::config::RunConfig;
use crate::utils::format_count;
use crate::Result;
use std::path::PathBuf;

/// Metadata key under which a model's config is embedded on save.
pub const CONFIG_KEY: &str = "config";

/// Models that can report how many learnable parameters they hold.
pub trait HasParameters {
    fn num_parameters(&self) -> usize;
}

/// A model bundled with its run config and a checkpoint store.
///
/// Every save embeds the config into the metadata under `"config"`, so a
/// checkpoint always records the hyperparameters it was trained with.
pub struct BaseModel<M: Checkpointable> {
    model: M,
    config: Metadata,
    store: CheckpointStore,
}

impl<M: Checkpointable> BaseModel<M> {
    /// Wrap a model with a JSON config and the default store.
    pub fn new(model: M, config: Metadata) -> Self {
        Self {
            model,
            config,
            store: CheckpointStore::default(),
        }
    }

    /// Wrap a model with a run config.
    ///
    /// The store is rooted at `output.model_dir` and the whole config is
    /// embedded on save.
    pub fn from_run_config(model: M, run_config: &RunConfig) -> Result<Self> {
        let output = run_config.output()?;
        let config = match run_config.to_json()? {
            serde_json::Value::Object(map) => map,
            _ => Metadata::new(),
        };

        Ok(Self {
            model,
            config,
            store: CheckpointStore::new(CheckpointConfig::new(output.model_dir)),
        })
    }

    /// Replace the checkpoint store.
    pub fn with_store(mut self, store: CheckpointStore) -> Self {
        self.store = store;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn config(&self) -> &Metadata {
        &self.config
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Save the wrapped model, embedding the config into `meta`.
    pub fn save_model(
        &self,
        meta: Option<Metadata>,
        version: Option<&str>,
        auto_increment: bool,
    ) -> Result<PathBuf> {
        let mut meta = meta.unwrap_or_default();
        meta.insert(
            CONFIG_KEY.to_string(),
            serde_json::Value::Object(self.config.clone()),
        );

        self.store.save(&self.model, &meta, version, auto_increment)
    }

    /// Restore the wrapped model in place and return the stored metadata.
    pub fn load_model(&mut self, version: Option<&str>) -> Result<Metadata> {
        self.store.load(&mut self.model, version)
    }

    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M: Checkpointable + HasParameters> BaseModel<M> {
    /// One-line description, e.g. `Linear with 1,290 parameters`.
    pub fn summary(&self) -> String {
        format!(
            "{} with {} parameters",
            self.model.model_kind(),
            format_count(self.model.num_parameters())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> CheckpointStore {
        CheckpointStore::new(CheckpointConfig::new(dir))
    }

    #[test]
    fn test_save_embeds_config() {
        let dir = tempdir().unwrap();
        let config = json!({"lr": 0.01}).as_object().cloned().unwrap();
        let base =
            BaseModel::new(Linear::seeded(2, 2, 3), config).with_store(store_in(dir.path()));

        let mut meta = Metadata::new();
        meta.insert("epoch".into(), json!(5));
        let path = base.save_model(Some(meta), None, true).unwrap();
        assert!(path.ends_with("Linear/v0.1.0"));

        let stored = base.store().read_metadata("Linear", None).unwrap();
        assert_eq!(stored["epoch"], 5);
        assert_eq!(stored[CONFIG_KEY]["lr"], 0.01);
    }

    #[test]
    fn test_config_replaces_caller_key() {
        let dir = tempdir().unwrap();
        let base =
            BaseModel::new(Linear::zeros(1, 1), Metadata::new()).with_store(store_in(dir.path()));

        let mut meta = Metadata::new();
        meta.insert(CONFIG_KEY.into(), json!("stale"));
        base.save_model(Some(meta), None, true).unwrap();

        let stored = base.store().read_metadata("Linear", None).unwrap();
        assert_eq!(stored[CONFIG_KEY], json!({}));
    }

    #[test]
    fn test_load_model_restores_in_place() {
        let dir = tempdir().unwrap();
        let trained = BaseModel::new(Linear::seeded(3, 2, 11), Metadata::new())
            .with_store(store_in(dir.path()));
        trained.save_model(None, Some("v1.0.0"), true).unwrap();

        let mut fresh = BaseModel::new(Linear::zeros(3, 2), Metadata::new())
            .with_store(store_in(dir.path()));
        let meta = fresh.load_model(Some("v1.0.0")).unwrap();

        assert_eq!(fresh.model(), trained.model());
        assert!(meta.contains_key(CONFIG_KEY));
    }

    #[test]
    fn test_from_run_config_uses_model_dir() {
        let dir = tempdir().unwrap();
        let model_dir = dir.path().join("weights");
        let yaml = format!(
            "model:\n  name: Linear\n\
             train:\n  epochs: 1\n  batch_size: 2\n  learning_rate: 0.1\n\
             output:\n  model_dir: {}\n",
            model_dir.display()
        );
        let run_config = RunConfig::from_yaml_str(&yaml).unwrap();

        let base = BaseModel::from_run_config(Linear::zeros(2, 1), &run_config).unwrap();
        let path = base.save_model(None, None, true).unwrap();

        assert_eq!(path, model_dir.join("Linear").join("v0.1.0"));
        let stored = base.store().read_metadata("Linear", None).unwrap();
        assert_eq!(stored[CONFIG_KEY]["model"]["name"], "Linear");
        assert_eq!(stored[CONFIG_KEY]["train"]["epochs"], 1);
    }

    #[test]
    fn test_summary() {
        let base = BaseModel::new(Linear::zeros(128, 10), Metadata::new());
        assert_eq!(base.summary(), "Linear with 1,290 parameters");
    }
}

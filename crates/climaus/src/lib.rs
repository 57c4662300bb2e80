//! # climaus
//!
//! Versioned on-disk checkpoints for trained models.
//!
//! ## Overview
//!
//! climaus provides:
//! - A `Checkpointable` trait for models whose weights can be snapshotted and restored
//! - `CheckpointStore`, a directory-per-model, directory-per-version checkpoint layout
//!   with automatic `v<major>.<minor>.<patch>` versioning
//! - A YAML run-config loader with required sections and defaults
//! - Process-wide logging setup on top of `tracing`
//! - `BaseModel`, a wrapper that embeds the run config into every saved checkpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use climaus::prelude::*;
//!
//! # fn main() -> climaus::Result<()> {
//! let store = CheckpointStore::new(CheckpointConfig::new("models/weights"));
//! let model = Linear::seeded(4, 2, 42);
//!
//! let mut meta = Metadata::new();
//! meta.insert("epochs".into(), 10.into());
//!
//! // First save lands in models/weights/Linear/v0.1.0
//! let path = store.save(&model, &meta, None, true)?;
//! println!("saved to {}", path.display());
//!
//! let mut restored = Linear::zeros(4, 2);
//! let meta = store.load(&mut restored, None)?;
//! assert_eq!(meta["epochs"], 10);
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod config;
pub mod log;
pub mod models;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::checkpoint::{
        increment_version, CheckpointConfig, CheckpointStore, Checkpointable, Metadata, Version,
        VersionOrdering,
    };
    pub use crate::config::{load_config, save_config, OutputConfig, RunConfig};
    pub use crate::log::{init_logging, LogConfig};
    pub use crate::models::{BaseModel, HasParameters, Linear};
    pub use crate::{ClimausError, Result};
}

#[doc(hidden)]
pub use tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum ClimausError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Model state error: {0}")]
    State(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = core::result::Result<T, ClimausError>;

//! climaus CLI
//!
//! Command-line interface for inspecting and populating checkpoint stores.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use climaus::checkpoint::{increment_version, CheckpointConfig, CheckpointStore, VersionOrdering};
use climaus::config::load_config;
use climaus::log::{init_logging, LogConfig};

mod demo;

const DEFAULT_BASE_DIR: &str = "models/weights";

#[derive(Parser)]
#[command(name = "climaus")]
#[command(version, about = "climaus - Versioned model checkpoints", long_about = None)]
struct Cli {
    /// Checkpoint store root [default: models/weights]
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Order versions as plain strings instead of numerically
    #[arg(long, global = true)]
    lexicographic: bool,

    /// Default log filter (RUST_LOG overrides it)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Also write logs to a rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved versions of a model kind
    Versions {
        /// Model kind (directory name under the base dir)
        kind: String,
    },

    /// Print the metadata of a saved version
    Meta {
        /// Model kind
        kind: String,

        /// Version to read (latest if omitted)
        #[arg(long)]
        version: Option<String>,
    },

    /// Print the version an auto-increment save would use after VERSION
    Bump {
        /// Current version, e.g. v0.3.0
        version: String,
    },

    /// Load and validate a run config
    CheckConfig {
        /// Path to the YAML config
        path: PathBuf,
    },

    /// Save a seeded linear model through the store
    Demo {
        /// Run config to embed; its output section picks the store and version
        #[arg(long)]
        config: Option<PathBuf>,

        /// Explicit version to save under
        #[arg(long)]
        version: Option<String>,

        /// Reuse the latest version instead of bumping it
        #[arg(long)]
        no_increment: bool,

        /// Seed for parameter init
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Input features
        #[arg(long, default_value = "8")]
        inputs: usize,

        /// Output features
        #[arg(long, default_value = "2")]
        outputs: usize,
    },
}

impl Cli {
    fn ordering(&self) -> VersionOrdering {
        if self.lexicographic {
            VersionOrdering::Lexicographic
        } else {
            VersionOrdering::Numeric
        }
    }

    fn store(&self) -> CheckpointStore {
        let base_dir = self
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));
        CheckpointStore::new(CheckpointConfig::new(base_dir).ordering(self.ordering()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::new().level(cli.log_level.clone());
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.log_to_file(dir);
    }
    init_logging(&log_config)?;

    match &cli.command {
        Commands::Versions { kind } => {
            list_versions(&cli.store(), kind)?;
        }
        Commands::Meta { kind, version } => {
            let meta = cli
                .store()
                .read_metadata(kind, version.as_deref())
                .with_context(|| format!("Cannot read metadata for '{}'", kind))?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        Commands::Bump { version } => {
            println!("{}", increment_version(version));
        }
        Commands::CheckConfig { path } => {
            let config = load_config(path)
                .with_context(|| format!("Invalid config '{}'", path.display()))?;
            let Some(name) = config.model_name() else {
                bail!("Config model.name must be a string");
            };
            let train = config.train()?;
            println!(
                "Config OK: model '{}', {} epochs, batch size {}, learning rate {}",
                name, train.epochs, train.batch_size, train.learning_rate
            );
        }
        Commands::Demo {
            config,
            version,
            no_increment,
            seed,
            inputs,
            outputs,
        } => {
            let request = demo::DemoRequest {
                config: config.clone(),
                version: version.clone(),
                auto_increment: !no_increment,
                seed: *seed,
                inputs: *inputs,
                outputs: *outputs,
            };
            let path = demo::run(cli.base_dir.as_deref(), cli.ordering(), request)?;
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

fn list_versions(store: &CheckpointStore, kind: &str) -> Result<()> {
    let versions = store.list_versions(kind)?;
    let latest = CheckpointStore::latest_version(&versions);

    if versions.is_empty() {
        println!("No versions found for {}", kind);
        return Ok(());
    }

    println!("Versions of {}:", kind);
    for v in &versions {
        if Some(v.as_str()) == latest {
            println!("  {} (latest)", v);
        } else {
            println!("  {}", v);
        }
    }
    Ok(())
}

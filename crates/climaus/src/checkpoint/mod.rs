//! Versioned checkpoint storage for trained models.
//!
//! Provides:
//! - `Checkpointable` trait for models whose weights can be saved/restored
//! - `CheckpointStore` for the directory-per-version layout
//! - `Version` parsing, auto-increment, and ordering of version names

mod state;
mod store;
mod version;

pub use state::{Checkpointable, Metadata, META_FILE, WEIGHTS_FILE};
pub use store::{CheckpointConfig, CheckpointStore};
pub use version::{
    increment_version, latest_version, ParseVersionError, Version, VersionOrdering,
    DEFAULT_VERSION, INITIAL_VERSION,
};

//! Process-wide logging setup.
//!
//! Provides:
//! - `init_logging` to install a `tracing` subscriber exactly once
//! - `LogConfig` for level and optional rolling file output
//! - `success!` for info events that mark a completed operation

mod subscriber;

pub use subscriber::{init_logging, LogConfig};

/// Log a successful outcome.
///
/// Emits an `info` event carrying the field `success = true`, so success
/// lines can be filtered apart from ordinary progress messages.
///
/// ```ignore
/// climaus::success!(path = %path.display(), "Model saved");
/// ```
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::tracing::info!(success = true, $($arg)+)
    };
}

//! Required and optional sections of a run config.

use serde_yaml::Value;

/// Sections that must be present, with the keys each must contain.
pub const REQUIRED_KEYS: &[(&str, &[&str])] = &[
    ("model", &["name"]),
    ("train", &["epochs", "batch_size", "learning_rate"]),
];

/// Name of the optional output section.
pub const OUTPUT_SECTION: &str = "output";

/// Default values for the `output` section, in the order they are written.
pub fn output_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("log_dir", Value::from("outputs/logs")),
        ("model_dir", Value::from("models/weights")),
        ("version", Value::Null),
        ("note", Value::from("")),
    ]
}

/// Whether `section` is one the loader knows about.
pub fn is_known_section(section: &str) -> bool {
    section == OUTPUT_SECTION || REQUIRED_KEYS.iter().any(|(name, _)| *name == section)
}

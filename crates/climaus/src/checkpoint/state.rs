//! Model handle trait and checkpoint artifact definitions.

use crate::utils::short_type_name;
use crate::Result;

/// File holding the serialized weight snapshot inside a version directory.
pub const WEIGHTS_FILE: &str = "model.bin";

/// File holding the metadata document inside a version directory.
pub const META_FILE: &str = "meta.json";

/// Caller-supplied annotations stored next to a weights artifact.
///
/// Keys keep their insertion order when written to `meta.json`.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Trait for models that can be checkpointed.
///
/// The store only borrows the model for the duration of a call: `save`
/// reads a snapshot through [`save_state`](Checkpointable::save_state), and
/// `load` restores it in place through [`load_state`](Checkpointable::load_state).
///
/// # Example
///
/// ```ignore
/// impl Checkpointable for MyModel {
///     fn save_state(&self) -> Result<Vec<u8>> {
///         Ok(serde_json::to_vec(&self.params)?)
///     }
///
///     fn load_state(&mut self, data: &[u8]) -> Result<()> {
///         self.params = serde_json::from_slice(data)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Checkpointable {
    /// Name of the directory grouping all versions of this model.
    ///
    /// Defaults to the type name without its module path or generics. The
    /// result is used verbatim as a path segment.
    fn model_kind(&self) -> String {
        short_type_name::<Self>().to_string()
    }

    /// Serialize the model's weights to bytes.
    fn save_state(&self) -> Result<Vec<u8>>;

    /// Restore the model's weights from bytes.
    fn load_state(&mut self, data: &[u8]) -> Result<()>;
}

//! Failure taxonomy.
//!
//! Nothing here is fatal: every error is recovered by clearing the in-flight
//! effect and letting the next tick reselect from scratch.

use crate::types::SpawnId;

/// Dispatch-time failures reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The resolved effect no longer exists host-side (spell unmemorized,
    /// item gone, ability untrained).
    #[error("effect \"{name}\" not found at cast time")]
    NotFound { name: String },

    /// The explicit target id did not match a live spawn.
    #[error("target {target} not found for \"{name}\"")]
    TargetMissing { name: String, target: SpawnId },
}

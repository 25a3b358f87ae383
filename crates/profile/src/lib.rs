//! Persisted rotation profiles and the loader that turns them into effect
//! descriptors.
//!
//! One RON settings file per character holds the pacing delay, quiet/debug
//! flags, the active rotation name, and the named rotation sections. Each
//! section entry keeps the caret-separated
//! `name^duration^condition^target` encoding; [`loader`] parses it and
//! resolves names through the host's
//! [`EffectOracle`](encore_core::EffectOracle).
mod error;
pub mod loader;
pub mod store;

pub use error::ProfileError;
pub use loader::{ParsedEntry, load_rotation, parse_entry};
pub use store::{RotationSection, Settings, SettingsStore};

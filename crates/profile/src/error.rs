use std::io;

/// Settings-store and profile failures. None of these stop the scheduler; a
/// failed load leaves the previous rotation in place.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("settings file I/O: {0}")]
    Io(#[from] io::Error),

    #[error("settings file parse: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("settings file write: {0}")]
    Serialize(#[from] ron::Error),

    #[error("no rotation named \"{0}\" in the settings file")]
    UnknownRotation(String),
}

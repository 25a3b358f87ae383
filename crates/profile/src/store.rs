//! RON-backed per-character settings.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encore_core::Millis;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// One named rotation section.
///
/// Entries keep the caret-separated `name^duration^condition^target`
/// encoding; only the name is mandatory. `per_target` lists the effect names
/// whose expiry is tracked per target rather than globally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationSection {
    #[serde(default)]
    pub entries: Vec<String>,
    /// Expression gating the whole section.
    #[serde(default)]
    pub gate: Option<String>,
    #[serde(default)]
    pub per_target: Vec<String>,
}

/// Everything persisted for one character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Pacing delay between casts, in tenths of a second.
    #[serde(default = "default_delay_tenths")]
    pub delay_tenths: u32,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub debug: bool,
    /// Rotation to resume on load.
    #[serde(default)]
    pub rotation: Option<String>,
    /// Whether the engine was casting when last saved.
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub rotations: BTreeMap<String, RotationSection>,
}

fn default_delay_tenths() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_tenths: default_delay_tenths(),
            quiet: false,
            debug: false,
            rotation: None,
            playing: false,
            rotations: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// The persisted delay as engine time.
    pub fn pacing_delay(&self) -> Millis {
        Millis(u64::from(self.delay_tenths) * 100)
    }
}

/// Settings file, one per server/character pair.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional `<dir>/<server>_<character>.ron` location.
    pub fn for_character(dir: &Path, server: &str, character: &str) -> Self {
        Self::new(dir.join(format!("{server}_{character}.ron")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as defaults; a corrupt one is an error.
    pub fn load(&self) -> Result<Settings, ProfileError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(ron::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(err) => Err(ProfileError::Io(err)),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ProfileError> {
        let text = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

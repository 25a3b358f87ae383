//! One character's scheduler: engine, settings, and the store they persist
//! to.

use encore_core::{Effect, EngineStatus, Env, Millis, RotationEngine, SpawnId};
use encore_profile::{ProfileError, Settings, SettingsStore, load_rotation};

use crate::chat;
use crate::command::{Command, CommandError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Ties a [`RotationEngine`] to its persisted [`Settings`].
///
/// Every toggle the command surface flips is written back to the settings
/// file immediately, so a reload (or a crash) finds the scheduler the way
/// the user left it.
pub struct Session {
    engine: RotationEngine,
    settings: Settings,
    store: SettingsStore,
}

impl Session {
    /// Loads persisted settings and, if a rotation was playing when last
    /// saved, restores and resumes it.
    pub fn restore(store: SettingsStore, env: &Env<'_>) -> Result<Self, ProfileError> {
        let settings = store.load()?;
        let mut session = Self {
            engine: RotationEngine::new(),
            settings,
            store,
        };
        session
            .engine
            .set_pacing_delay(session.settings.pacing_delay());
        if let Some(name) = session.settings.rotation.clone() {
            match session.install(&name, env) {
                Ok(()) => {
                    if !session.settings.playing {
                        session.engine.suspend();
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "saved rotation could not be restored");
                }
            }
        }
        Ok(session)
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies one `/encore` command line.
    pub fn handle_command(&mut self, line: &str, env: &Env<'_>) -> Result<(), SessionError> {
        match Command::parse(line)? {
            Command::Start { silent } => {
                if self.engine.rotation().is_empty() {
                    self.say("no rotation loaded; /encore <name> to load one");
                    return Ok(());
                }
                self.engine.start();
                self.settings.playing = true;
                self.persist()?;
                if !silent {
                    self.say("resuming rotation");
                }
            }
            Command::Stop { silent } => {
                self.engine.stop(env);
                self.settings.playing = false;
                self.persist()?;
                if !silent {
                    self.say("stopping rotation");
                }
            }
            Command::Reload => {
                self.settings = self.store.load()?;
                self.engine.set_pacing_delay(self.settings.pacing_delay());
                if let Some(name) = self.settings.rotation.clone() {
                    self.install(&name, env)?;
                    if !self.settings.playing {
                        self.engine.suspend();
                    }
                } else {
                    self.engine.clear(env);
                }
                self.say("settings reloaded");
            }
            Command::Delay(None) => {
                self.say(&format!("delay is {}", self.settings.delay_tenths));
            }
            Command::Delay(Some(tenths)) => {
                self.settings.delay_tenths = tenths;
                self.engine.set_pacing_delay(self.settings.pacing_delay());
                self.persist()?;
                self.say(&format!("delay set to {tenths}"));
            }
            Command::ToggleQuiet => {
                self.settings.quiet = !self.settings.quiet;
                self.persist()?;
                tracing::info!(quiet = self.settings.quiet, "quiet toggled");
            }
            Command::ToggleDebug => {
                self.settings.debug = !self.settings.debug;
                self.persist()?;
                self.say(&format!(
                    "debug is now {}",
                    if self.settings.debug { "on" } else { "off" }
                ));
            }
            Command::Clear => {
                self.engine.clear(env);
                self.settings.rotation = None;
                self.settings.playing = false;
                self.persist()?;
                self.say("rotation cleared");
            }
            Command::Help => {
                self.say(
                    "usage: /encore [<name>|start|stop|reload|delay #|quiet|debug|clear|\
                     queue \"name\" [-targetid|N] [-interrupt]]",
                );
            }
            Command::Queue {
                name,
                target,
                interrupt,
            } => {
                let Some((kind, cast_time)) = env.effects().resolve(&name) else {
                    tracing::warn!(%name, "unable to find anything to queue by that name");
                    return Ok(());
                };
                let per_target = self.active_section_lists_per_target(&name);
                let effect =
                    Effect::new(name, kind, cast_time).with_per_target(per_target);
                self.engine.queue(effect, target, interrupt, env);
            }
            Command::Load(name) => {
                self.install(&name, env)?;
                self.settings.rotation = Some(name);
                self.settings.playing = true;
                self.persist()?;
            }
        }
        Ok(())
    }

    /// Forwards the host tick.
    pub fn pulse(&mut self, env: &Env<'_>) {
        self.engine.pulse(env);
    }

    /// Feeds an incoming chat line through the interrupt patterns.
    pub fn on_chat_line(&mut self, line: &str, env: &Env<'_>) {
        if !self.engine.is_enabled() {
            return;
        }
        if let Some(kind) = chat::classify(line) {
            self.engine.notify_interrupted(kind, env);
        }
    }

    pub fn on_spawn_removed(&mut self, target: SpawnId) {
        self.engine.notify_spawn_removed(target);
    }

    pub fn on_zone_change(&mut self) {
        self.engine.notify_zone_change();
    }

    /// Read-only snapshot for the scripting surface.
    pub fn status(&self, env: &Env<'_>) -> EngineStatus {
        self.engine.status(env)
    }

    pub fn pacing_delay(&self) -> Millis {
        self.engine.pacing_delay()
    }

    fn install(&mut self, name: &str, env: &Env<'_>) -> Result<(), ProfileError> {
        let section = self
            .settings
            .rotations
            .get(name)
            .ok_or_else(|| ProfileError::UnknownRotation(name.to_owned()))?;
        let (effects, gate) = load_rotation(section, env.effects());
        self.say(&format!(
            "loaded rotation \"{name}\" with {} effects",
            effects.len()
        ));
        self.engine.install_rotation(name, effects, gate);
        Ok(())
    }

    fn active_section_lists_per_target(&self, name: &str) -> bool {
        self.settings
            .rotation
            .as_ref()
            .and_then(|rotation| self.settings.rotations.get(rotation))
            .is_some_and(|section| section.per_target.iter().any(|n| n == name))
    }

    fn persist(&self) -> Result<(), ProfileError> {
        self.store.save(&self.settings)
    }

    /// User-visible chatter, suppressed by the quiet flag.
    fn say(&self, message: &str) {
        if !self.settings.quiet {
            tracing::info!("{message}");
        }
    }
}

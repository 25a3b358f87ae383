//! The pulse-driven engine that keeps a rotation running.
//!
//! [`RotationEngine`] is the authoritative owner of the rotation, the expiry
//! ledger, and the in-flight scheduling state. The host calls [`pulse`] from
//! its periodic tick; command handling and lifecycle notifications arrive on
//! the same logical thread, so there is no interior locking.
//!
//! [`pulse`]: RotationEngine::pulse

use crate::effect::Effect;
use crate::error::DispatchError;
use crate::host::{self, CharacterState, Env};
use crate::ledger::ExpiryLedger;
use crate::rotation::Rotation;
use crate::scheduler;
use crate::types::{Millis, SpawnId};

/// Backoff after a stun-class interrupt, so cast attempts do not hammer
/// straight back into the trigger message.
pub const STUN_BACKOFF: Millis = Millis(1000);

/// External interrupt signals the host feeds back into the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptKind {
    /// Cast broken (missed note, fizzle, interrupted spell): reconsider
    /// immediately.
    Broken,
    /// Stunned mid-cast: back off briefly before retrying.
    Stunned,
}

/// Read-only snapshot exposed to the scripting surface.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineStatus {
    /// Active rotation name, if one is loaded.
    pub rotation: Option<String>,
    /// Estimated seconds until the one-shot queue drains; 0.0 in steady
    /// state.
    pub time_to_queue_empty: f64,
    /// True while the engine is trying to cast.
    pub active: bool,
}

/// Pulse state machine driving one rotation.
#[derive(Debug)]
pub struct RotationEngine {
    rotation: Rotation,
    ledger: ExpiryLedger,
    /// The effect whose dispatch is currently in flight, tracked outside the
    /// rotation itself.
    current: Option<Effect>,
    /// No dispatch is considered before this deadline passes.
    cast_due: Millis,
    interrupted: bool,
    /// Target to restore on the next pulse after a one-tick redirect.
    saved_target: Option<SpawnId>,
    enabled: bool,
    pacing_delay: Millis,
}

impl RotationEngine {
    pub const DEFAULT_PACING_DELAY: Millis = Millis(300);

    pub fn new() -> Self {
        Self {
            rotation: Rotation::new(),
            ledger: ExpiryLedger::new(),
            current: None,
            cast_due: Millis::ZERO,
            interrupted: false,
            saved_target: None,
            enabled: false,
            pacing_delay: Self::DEFAULT_PACING_DELAY,
        }
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    pub fn ledger(&self) -> &ExpiryLedger {
        &self.ledger
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pacing_delay(&self) -> Millis {
        self.pacing_delay
    }

    pub fn set_pacing_delay(&mut self, delay: Millis) {
        self.pacing_delay = delay;
    }

    /// Installs a freshly loaded rotation and starts it.
    pub fn install_rotation(
        &mut self,
        name: impl Into<String>,
        effects: impl IntoIterator<Item = Effect>,
        gate_expr: Option<String>,
    ) {
        self.rotation.load(name, effects, gate_expr);
        self.current = None;
        self.interrupted = false;
        self.start();
    }

    /// Starts or resumes the loaded rotation.
    pub fn start(&mut self) {
        self.enabled = true;
        self.cast_due = Millis::ZERO;
    }

    /// Stops considering casts without touching the rotation. Pure state
    /// change; [`stop`](Self::stop) also aborts the in-flight cast host-side.
    pub fn suspend(&mut self) {
        self.enabled = false;
        self.current = None;
        self.cast_due = Millis::ZERO;
        self.interrupted = false;
    }

    /// Stops casting. Idempotent.
    pub fn stop(&mut self, env: &Env<'_>) {
        self.suspend();
        env.effects().stop_casting();
    }

    /// Stops and forgets the rotation entirely. Idempotent.
    pub fn clear(&mut self, env: &Env<'_>) {
        self.stop(env);
        self.rotation.clear();
    }

    /// Queues a one-shot dispatch of `effect`, optionally interrupting the
    /// in-flight cast so the one-shot goes out on the next eligible tick.
    pub fn queue(
        &mut self,
        effect: Effect,
        target: Option<SpawnId>,
        interrupt: bool,
        env: &Env<'_>,
    ) {
        let mut effect = effect.with_once();
        if let Some(id) = target {
            effect = effect.with_target_id(id);
        }
        if interrupt {
            self.current = None;
            self.cast_due = Millis::ZERO;
            env.effects().stop_casting();
        }
        tracing::debug!(name = %effect.name, interrupt, "queueing one-shot");
        self.rotation.queue_front(effect);
    }

    /// Host signal that the cast in flight was interrupted.
    pub fn notify_interrupted(&mut self, kind: InterruptKind, env: &Env<'_>) {
        if !self.enabled {
            return;
        }
        tracing::debug!(?kind, "cast interrupted");
        self.interrupted = true;
        self.cast_due = match kind {
            InterruptKind::Broken => Millis::ZERO,
            InterruptKind::Stunned => env.now() + STUN_BACKOFF,
        };
    }

    /// Host signal that a spawn despawned; its per-target expiries go stale.
    pub fn notify_spawn_removed(&mut self, target: SpawnId) {
        self.ledger.purge_target(target);
        if self.saved_target == Some(target) {
            self.saved_target = None;
        }
    }

    /// Host signal that the character changed zones.
    pub fn notify_zone_change(&mut self) {
        self.ledger.clear_targets();
    }

    pub fn status(&self, env: &Env<'_>) -> EngineStatus {
        EngineStatus {
            rotation: self.rotation.name().map(str::to_owned),
            time_to_queue_empty: self.time_to_queue_empty(env.now()),
            active: self.enabled,
        }
    }

    /// Estimated seconds until every queued one-shot has gone out: the
    /// remaining in-flight time when the effect currently casting is a
    /// one-shot, plus pacing and cast time for each queued one-shot.
    /// Steady-state rotation work counts as zero.
    pub fn time_to_queue_empty(&self, now: Millis) -> f64 {
        let mut total = Millis::ZERO;
        if self.current.as_ref().is_some_and(|e| e.once) && now < self.cast_due {
            total += self.cast_due.saturating_sub(now);
        }
        for effect in self.rotation.iter().filter(|e| e.once) {
            total += self.pacing_delay + effect.cast_time;
        }
        total.as_secs_f64()
    }

    /// One host tick: gate, recover from interrupts, select, dispatch.
    pub fn pulse(&mut self, env: &Env<'_>) {
        if !self.enabled || !self.character_can_cast(env) {
            return;
        }
        if self.rotation.is_empty() {
            return;
        }

        // A redirect from the previous tick is held for exactly one pulse.
        if let Some(saved) = self.saved_target.take() {
            tracing::debug!(%saved, "restoring previous target");
            env.target().set_target(saved);
        }

        // A visible casting window means the previous cast is still going or
        // the user is casting by hand. Stay out of it either way.
        if env.character().casting_window_open() {
            return;
        }

        if let Some(gate) = self.rotation.gate_expr()
            && !host::eval_condition(env.evaluator(), gate)
        {
            tracing::debug!(gate, "rotation gate is false");
            return;
        }

        let now = env.now();
        if now <= self.cast_due {
            return;
        }

        if self.interrupted
            && self
                .current
                .as_ref()
                .is_some_and(|effect| env.effects().is_ready(effect))
        {
            // Recast the interrupted effect as-is: no ledger write for the
            // aborted attempt, no reselection.
            self.interrupted = false;
            tracing::info!("recasting interrupted effect");
        } else {
            let was_interrupted = std::mem::take(&mut self.interrupted);
            if was_interrupted {
                tracing::info!("interrupted effect no longer ready, dropping it");
            }

            if let Some(previous) = self.current.take() {
                // Only a completed normal dispatch earns a ledger write; an
                // aborted one would overstate uptime, and a one-shot is not
                // tracked at all.
                if !was_interrupted && !previous.once {
                    let duration =
                        host::eval_number(env.evaluator(), &previous.duration_expr);
                    let expires_at = now + Millis::from_secs_f64(duration);
                    self.ledger
                        .record(&previous, env.target().current_target(), expires_at);
                }
            }

            let Some(mut next) =
                scheduler::schedule_next(&mut self.rotation, &self.ledger, env, now)
            else {
                return;
            };
            if !next.target_expr.is_empty() {
                next.target_id = host::eval_target(env.evaluator(), &next.target_expr);
            }
            tracing::info!(name = %next.name, "scheduled");
            self.current = Some(next);
        }

        self.dispatch_current(env, now);
    }

    fn dispatch_current(&mut self, env: &Env<'_>, now: Millis) {
        let Some(effect) = self.current.clone() else {
            return;
        };

        if let Some(target) = effect.target_id {
            let previous = env.target().current_target();
            if !env.target().set_target(target) {
                let error = DispatchError::TargetMissing {
                    name: effect.name.clone(),
                    target,
                };
                tracing::warn!(%error, "skipping dispatch");
                self.current = None;
                return;
            }
            // Reverted unconditionally on the next pulse.
            self.saved_target = previous;
        }

        match env.effects().dispatch(&effect) {
            Ok(cast_time) => {
                self.cast_due = now + cast_time + self.pacing_delay;
                tracing::debug!(name = %effect.name, %cast_time, "cast issued");
            }
            Err(error) => {
                // Non-fatal: clear and let the next tick reselect.
                tracing::warn!(%error, "dispatch failed");
                self.current = None;
            }
        }
    }

    fn character_can_cast(&self, env: &Env<'_>) -> bool {
        let Some(state) = env.character().state() else {
            return false;
        };
        if state.contains(CharacterState::FEIGNED) {
            // Cannot cast while feigned; stand so a later tick can.
            env.character().stand();
            return false;
        }
        state.can_cast()
    }
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new()
    }
}

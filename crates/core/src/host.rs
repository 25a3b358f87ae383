//! Host collaborator contracts.
//!
//! Everything the engine needs from the surrounding application is expressed
//! as a narrow oracle trait, aggregated in [`Env`]. The host wires its real
//! facilities in; tests substitute deterministic stubs. Oracles take `&self`
//! — hosts with mutable innards (target switching, stand commands) are
//! expected to use interior mutability, the whole engine being bound to one
//! logical thread anyway.

use crate::effect::{Effect, EffectKind};
use crate::error::DispatchError;
use crate::types::{Millis, SpawnId};

/// Monotonic host clock.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// External expression evaluator.
///
/// The engine never parses expressions; it hands strings over verbatim and
/// interprets the reply numerically via the helpers below.
pub trait Evaluator {
    fn evaluate(&self, expr: &str) -> String;
}

/// Parses an evaluator reply as a number, defaulting to 0.0 on failure.
pub fn eval_number(evaluator: &dyn Evaluator, expr: &str) -> f64 {
    evaluator.evaluate(expr).trim().parse().unwrap_or(0.0)
}

/// Truthiness of an evaluator reply: any non-zero number is true.
pub fn eval_condition(evaluator: &dyn Evaluator, expr: &str) -> bool {
    eval_number(evaluator, expr) != 0.0
}

/// Evaluates a target expression to a spawn id; zero or garbage means none.
pub fn eval_target(evaluator: &dyn Evaluator, expr: &str) -> Option<SpawnId> {
    let id = eval_number(evaluator, expr);
    (id >= 1.0).then(|| SpawnId(id as u32))
}

/// Cast-side host facilities: name resolution, the cooldown oracle, and the
/// fire-and-forget cast primitive.
pub trait EffectOracle {
    /// Resolves a name to a kind and base cast time, trying spell, then
    /// item, then ability. `None` when the host knows no such effect.
    fn resolve(&self, name: &str) -> Option<(EffectKind, Millis)>;

    /// Whether the effect's reuse timer has elapsed.
    fn is_ready(&self, effect: &Effect) -> bool;

    /// Issues the cast. Returns the expected cast duration on success; the
    /// host signals interruption separately, so a returned duration only
    /// means the cast started.
    fn dispatch(&self, effect: &Effect) -> Result<Millis, DispatchError>;

    /// Aborts whatever the character is currently performing.
    fn stop_casting(&self);
}

/// Current-target manipulation for one-tick redirects.
pub trait TargetOracle {
    fn current_target(&self) -> Option<SpawnId>;

    /// Retargets to `id`; false when that spawn no longer exists.
    fn set_target(&self, id: SpawnId) -> bool;
}

bitflags::bitflags! {
    /// Condition word gating whether the character can cast at all.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CharacterState: u16 {
        const STUNNED      = 1 << 0;
        const SITTING      = 1 << 1;
        const FEIGNED      = 1 << 2;
        const DEAD         = 1 << 3;
        const HOVERING     = 1 << 4;
        const SILENCED     = 1 << 5;
        const INVULNERABLE = 1 << 6;
    }
}

impl CharacterState {
    /// True when no blocking condition is set.
    pub fn can_cast(self) -> bool {
        self.is_empty()
    }
}

/// Character condition and casting-UI state.
pub trait CharacterOracle {
    /// `None` when the character does not exist (character select, zoning).
    fn state(&self) -> Option<CharacterState>;

    /// Issues a stand command; used to break feign so casting can resume.
    fn stand(&self);

    /// True while the host casting window is up, meaning the previous cast
    /// is still going or the user is casting by hand.
    fn casting_window_open(&self) -> bool;
}

/// Aggregates every host facility the engine touches during a tick.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    clock: &'a dyn Clock,
    evaluator: &'a dyn Evaluator,
    effects: &'a dyn EffectOracle,
    target: &'a dyn TargetOracle,
    character: &'a dyn CharacterOracle,
}

impl<'a> Env<'a> {
    pub fn new(
        clock: &'a dyn Clock,
        evaluator: &'a dyn Evaluator,
        effects: &'a dyn EffectOracle,
        target: &'a dyn TargetOracle,
        character: &'a dyn CharacterOracle,
    ) -> Self {
        Self {
            clock,
            evaluator,
            effects,
            target,
            character,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn evaluator(&self) -> &'a dyn Evaluator {
        self.evaluator
    }

    pub fn effects(&self) -> &'a dyn EffectOracle {
        self.effects
    }

    pub fn target(&self) -> &'a dyn TargetOracle {
        self.target
    }

    pub fn character(&self) -> &'a dyn CharacterOracle {
        self.character
    }
}

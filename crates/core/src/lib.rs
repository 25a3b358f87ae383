//! Rotation scheduling engine for host-driven, timed repeating effects.
//!
//! `encore-core` owns the data model (effect descriptors, expiry ledger,
//! rotation set), the next-effect selection policy, and the pulse state
//! machine that decides each tick whether to (re)cast, wait, or skip. Host
//! facilities — clock, expression evaluator, cooldown oracle, cast
//! primitive, targeting — sit behind the oracle traits in [`host`], so the
//! engine itself performs no I/O and every test can substitute deterministic
//! stubs.
pub mod effect;
pub mod engine;
pub mod error;
pub mod host;
pub mod ledger;
pub mod rotation;
pub mod scheduler;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use effect::{Effect, EffectKind};
pub use engine::{EngineStatus, InterruptKind, RotationEngine, STUN_BACKOFF};
pub use error::DispatchError;
pub use host::{
    CharacterOracle, CharacterState, Clock, EffectOracle, Env, Evaluator, TargetOracle,
};
pub use ledger::ExpiryLedger;
pub use rotation::{MAX_ROTATION_SIZE, Rotation};
pub use scheduler::{CAST_LOOKAHEAD, schedule_next};
pub use types::{Millis, SpawnId};

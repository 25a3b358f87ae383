//! Effect descriptors: the schedulable unit of a rotation.

use crate::types::{Millis, SpawnId};

/// How an effect is performed on the host side.
///
/// Name resolution tries these in order — spell, then item, then ability —
/// and the first match wins. A name that resolves to none of them never
/// becomes an [`Effect`] at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum EffectKind {
    /// Memorized spell; the host looks its cast time up live.
    Spell,
    /// Activatable inventory item; cast time cached at resolution.
    Item,
    /// Trained activated ability; cast time cached at resolution.
    Ability,
}

/// One schedulable effect in a rotation.
///
/// The duration, condition, and target fields are strings in the host's
/// expression language. The engine never parses them; it hands them to the
/// [`Evaluator`](crate::host::Evaluator) lazily and interprets the reply
/// numerically.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    /// Host-namespace-unique name within its kind.
    pub name: String,
    pub kind: EffectKind,
    /// Base time to perform the cast.
    pub cast_time: Millis,
    /// Expression for the beneficial duration, in seconds.
    pub duration_expr: String,
    /// Expression gating whether the effect may be cast now; falsy skips it.
    pub condition_expr: String,
    /// Expression yielding a concrete target id, evaluated at selection time.
    pub target_expr: String,
    /// Queue-once: selected ahead of everything else, exactly once.
    pub once: bool,
    /// Expiry is tracked per current target instead of globally.
    pub per_target: bool,
    /// Explicit dispatch target, set directly or from `target_expr`.
    pub target_id: Option<SpawnId>,
}

impl Effect {
    pub const DEFAULT_DURATION_EXPR: &'static str = "180";
    pub const DEFAULT_CONDITION_EXPR: &'static str = "1";

    pub fn new(name: impl Into<String>, kind: EffectKind, cast_time: Millis) -> Self {
        Self {
            name: name.into(),
            kind,
            cast_time,
            duration_expr: Self::DEFAULT_DURATION_EXPR.to_owned(),
            condition_expr: Self::DEFAULT_CONDITION_EXPR.to_owned(),
            target_expr: String::new(),
            once: false,
            per_target: false,
            target_id: None,
        }
    }

    #[must_use]
    pub fn with_duration_expr(mut self, expr: impl Into<String>) -> Self {
        self.duration_expr = expr.into();
        self
    }

    #[must_use]
    pub fn with_condition_expr(mut self, expr: impl Into<String>) -> Self {
        self.condition_expr = expr.into();
        self
    }

    #[must_use]
    pub fn with_target_expr(mut self, expr: impl Into<String>) -> Self {
        self.target_expr = expr.into();
        self
    }

    #[must_use]
    pub fn with_once(mut self) -> Self {
        self.once = true;
        self
    }

    #[must_use]
    pub fn with_per_target(mut self, per_target: bool) -> Self {
        self.per_target = per_target;
        self
    }

    #[must_use]
    pub fn with_target_id(mut self, target: SpawnId) -> Self {
        self.target_id = Some(target);
        self
    }
}

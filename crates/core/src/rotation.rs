//! The ordered working set of effects being kept active.

use std::collections::VecDeque;

use crate::effect::Effect;

/// Hard cap on entries loaded from one profile. Queued one-shots may push
/// the working set past this transiently.
pub const MAX_ROTATION_SIZE: usize = 30;

/// Ordered effect list plus the profile-wide gate expression.
///
/// One-shot entries go to the front so they outrank everything during
/// selection; repeating entries stay until the rotation is cleared or
/// replaced by a load.
#[derive(Clone, Debug, Default)]
pub struct Rotation {
    name: Option<String>,
    effects: VecDeque<Effect>,
    gate_expr: Option<String>,
}

impl Rotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole rotation with a freshly loaded profile.
    pub fn load(
        &mut self,
        name: impl Into<String>,
        effects: impl IntoIterator<Item = Effect>,
        gate_expr: Option<String>,
    ) {
        self.name = Some(name.into());
        self.effects = effects.into_iter().collect();
        self.gate_expr = gate_expr;
    }

    /// Pushes a one-shot entry at the front of the dispatch order.
    pub fn queue_front(&mut self, effect: Effect) {
        debug_assert!(effect.once);
        self.effects.push_front(effect);
    }

    pub fn clear(&mut self) {
        self.name = None;
        self.effects.clear();
        self.gate_expr = None;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn gate_expr(&self) -> Option<&str> {
        self.gate_expr.as_deref()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Effect> {
        self.effects.get(index)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Effect> {
        self.effects.remove(index)
    }
}

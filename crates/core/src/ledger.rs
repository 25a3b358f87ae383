//! Expiry bookkeeping for active effects.

use std::collections::HashMap;

use crate::effect::Effect;
use crate::types::{Millis, SpawnId};

/// Tracks when each effect's beneficial duration ends.
///
/// Entries are keyed globally by effect name, except per-target effects
/// (damage-over-time style), which are keyed by the target the cast was
/// aimed at. A key that was never recorded reads as expired `now`; that is
/// what makes every effect of a freshly loaded rotation immediately eligible
/// for its first cast.
#[derive(Clone, Debug, Default)]
pub struct ExpiryLedger {
    global: HashMap<String, Millis>,
    per_target: HashMap<SpawnId, HashMap<String, Millis>>,
}

impl ExpiryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiry for `effect`, treating unseen keys as already expired.
    pub fn expiry(&self, effect: &Effect, target: Option<SpawnId>, now: Millis) -> Millis {
        let recorded = if effect.per_target {
            target
                .and_then(|id| self.per_target.get(&id))
                .and_then(|entries| entries.get(&effect.name))
        } else {
            self.global.get(&effect.name)
        };
        recorded.copied().unwrap_or(now)
    }

    /// Records the expiry written after a successful dispatch.
    ///
    /// A per-target effect with no current target has nothing to key on and
    /// is not recorded.
    pub fn record(&mut self, effect: &Effect, target: Option<SpawnId>, expires_at: Millis) {
        if effect.per_target {
            let Some(id) = target else { return };
            self.per_target
                .entry(id)
                .or_default()
                .insert(effect.name.clone(), expires_at);
        } else {
            self.global.insert(effect.name.clone(), expires_at);
        }
    }

    /// Drops every per-target entry for a spawn that no longer exists.
    pub fn purge_target(&mut self, target: SpawnId) {
        self.per_target.remove(&target);
    }

    /// Drops all per-target entries, e.g. after a zone change.
    pub fn clear_targets(&mut self) {
        self.per_target.clear();
    }

    pub fn clear(&mut self) {
        self.global.clear();
        self.per_target.clear();
    }
}

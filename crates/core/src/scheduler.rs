//! Next-effect selection.

use crate::effect::Effect;
use crate::host::{self, Env};
use crate::ledger::ExpiryLedger;
use crate::rotation::Rotation;
use crate::types::Millis;

/// Margin subtracted from every must-cast-by deadline: assume whatever gets
/// scheduled after this effect takes about this long to cast, so this one
/// has to start early enough that nothing lapses in the meantime.
pub const CAST_LOOKAHEAD: Millis = Millis(3000);

/// Picks the next effect to (re)cast, or `None` when nothing is both ready
/// and eligible.
///
/// Greedy earliest-deadline-first with a lookahead margin:
/// - one-shots always preempt and are consumed here, whatever the dispatch
///   outcome turns out to be;
/// - an effect whose must-cast-by deadline has arrived preempts regardless
///   of its position in the rotation;
/// - otherwise the soonest-expiring candidate wins.
pub fn schedule_next(
    rotation: &mut Rotation,
    ledger: &ExpiryLedger,
    env: &Env<'_>,
    now: Millis,
) -> Option<Effect> {
    let current_target = env.target().current_target();
    let mut stalest: Option<(usize, Millis)> = None;
    let mut queued_once = None;

    for (index, effect) in rotation.iter().enumerate() {
        if !env.effects().is_ready(effect) {
            tracing::debug!(name = %effect.name, "skipping (not ready)");
            continue;
        }
        if !host::eval_condition(env.evaluator(), &effect.condition_expr) {
            tracing::debug!(name = %effect.name, "skipping (condition not met)");
            continue;
        }

        // Consumed below, once the iteration borrow is released.
        if effect.once {
            queued_once = Some(index);
            break;
        }

        let expiry = ledger.expiry(effect, current_target, now);
        let must_cast_by = expiry.saturating_sub(effect.cast_time + CAST_LOOKAHEAD);
        if must_cast_by <= now {
            tracing::debug!(name = %effect.name, %expiry, "urgent, casting now");
            return Some(effect.clone());
        }

        match stalest {
            Some((_, soonest)) if soonest <= expiry => {}
            _ => stalest = Some((index, expiry)),
        }
    }

    if let Some(index) = queued_once {
        return rotation.remove(index);
    }

    match stalest {
        Some((index, _)) => {
            let effect = rotation.get(index).cloned();
            if let Some(effect) = &effect {
                tracing::debug!(name = %effect.name, "nothing urgent, refreshing stalest");
            }
            effect
        }
        None => {
            tracing::debug!("no effect ready or eligible");
            None
        }
    }
}

//! Parsing rotation sections into effect descriptors.

use encore_core::{Effect, EffectOracle, MAX_ROTATION_SIZE};

use crate::store::RotationSection;

/// A caret entry split into fields, before host resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedEntry {
    pub name: String,
    pub duration_expr: String,
    pub condition_expr: String,
    pub target_expr: String,
}

/// Splits `name^duration^condition^target`.
///
/// Only the name is mandatory; missing or empty trailing fields default to
/// "180" (seconds), "1" (always eligible), and no target expression.
/// `None` means the entry is malformed (empty name).
pub fn parse_entry(entry: &str) -> Option<ParsedEntry> {
    let mut fields = entry.splitn(4, '^');
    let name = fields.next()?.trim();
    if name.is_empty() {
        return None;
    }

    let mut field = |default: &str| {
        fields
            .next()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(default)
            .to_owned()
    };
    Some(ParsedEntry {
        name: name.to_owned(),
        duration_expr: field(Effect::DEFAULT_DURATION_EXPR),
        condition_expr: field(Effect::DEFAULT_CONDITION_EXPR),
        target_expr: field(""),
    })
}

/// Resolves a section's entries into effect descriptors.
///
/// Malformed entries and names the host cannot resolve are dropped with a
/// warning; everything else still loads. Returns the effects in entry order
/// plus the section's gate expression.
pub fn load_rotation(
    section: &RotationSection,
    oracle: &dyn EffectOracle,
) -> (Vec<Effect>, Option<String>) {
    let mut effects = Vec::new();
    for entry in section.entries.iter().take(MAX_ROTATION_SIZE) {
        let Some(parsed) = parse_entry(entry) else {
            tracing::warn!(entry, "malformed rotation entry, skipping");
            continue;
        };
        let Some((kind, cast_time)) = oracle.resolve(&parsed.name) else {
            tracing::warn!(
                name = %parsed.name,
                "no spell, item, or ability by that name, skipping"
            );
            continue;
        };

        let per_target = section.per_target.iter().any(|n| n == &parsed.name);
        let effect = Effect::new(parsed.name, kind, cast_time)
            .with_duration_expr(parsed.duration_expr)
            .with_condition_expr(parsed.condition_expr)
            .with_target_expr(parsed.target_expr)
            .with_per_target(per_target);
        tracing::debug!(name = %effect.name, kind = %effect.kind, "loaded rotation entry");
        effects.push(effect);
    }
    (effects, section.gate.clone())
}

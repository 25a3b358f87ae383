//! Chat-line patterns signalling that the cast in flight died.

use encore_core::InterruptKind;

/// Maps an incoming chat line to an interrupt signal, or `None` for ordinary
/// chatter.
///
/// The miss-a-note message embeds the song name, so only its fixed prefix and
/// suffix are matched; the rest are exact server strings.
pub fn classify(line: &str) -> Option<InterruptKind> {
    if line == "You can't cast spells while stunned!" {
        return Some(InterruptKind::Stunned);
    }

    let broken = line == "You haven't recovered yet..."
        || (line.starts_with("You miss a note, bringing ") && line.ends_with(" to a close!"))
        || (line.starts_with("Your ") && line.ends_with(" spell is interrupted."));
    broken.then_some(InterruptKind::Broken)
}

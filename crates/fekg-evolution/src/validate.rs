//! Per-link validation. Failures are diagnostics, never errors.

use fekg_core::EvolutionLink;

use crate::types::RejectionReason;

/// Scores and component scores must be finite and within `[0, 1]`.
fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Check a link against the data-model invariants.
///
/// Returns the first violated invariant, or `None` if the link is usable.
pub fn check_link(link: &EvolutionLink) -> Option<RejectionReason> {
    if link.from.is_blank() || link.to.is_blank() {
        return Some(RejectionReason::MissingEndpoint);
    }

    if link.from == link.to {
        return Some(RejectionReason::SelfLoop);
    }

    if !in_unit_range(link.score) {
        return Some(RejectionReason::ScoreOutOfRange { value: link.score });
    }

    link.components
        .present()
        .find(|&(_, value)| !in_unit_range(value))
        .map(|(component, value)| RejectionReason::ComponentOutOfRange { component, value })
}

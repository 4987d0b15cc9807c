//! BLAKE3 content fingerprint of resolver inputs.
//!
//! The resolver keeps no cache. Callers that memoize results across calls
//! key them on this digest: identical `(focal, links, options)` produce the
//! same fingerprint regardless of link order.

use serde::Serialize;

use fekg_core::EvolutionLink;

use crate::error::Result;
use crate::types::ResolveOptions;

/// Hashable representation of one resolution request.
#[derive(Serialize)]
struct HashableInputs<'a> {
    focal_event_id: &'a str,
    options: &'a ResolveOptions,
    /// Canonical JSON of each link, sorted.
    links: Vec<String>,
}

/// Compute the hex-encoded BLAKE3 digest of a resolution request.
///
/// Each link is rendered to JSON (fixed field order) and the renderings are
/// sorted, so reordering the input slice does not change the digest.
pub fn fingerprint(
    focal_event_id: &str,
    links: &[EvolutionLink],
    options: &ResolveOptions,
) -> Result<String> {
    let mut rendered = links
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rendered.sort_unstable();

    let hashable = HashableInputs {
        focal_event_id,
        options,
        links: rendered,
    };

    let json = serde_json::to_vec(&hashable)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}

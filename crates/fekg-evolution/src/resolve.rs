//! Direction split, deduplication, and ranking of links around a focal event.
//!
//! Pipeline: validate → score threshold → partition by direction →
//! collapse `(from, to, type)` duplicates → sort. Pure over its inputs;
//! links are cloned into the result, never mutated in place. Output does not
//! depend on input order.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use fekg_core::{Event, EventId, EvolutionLink, LinkKey};

use crate::error::{EvolutionError, Result};
use crate::types::{LinkCounts, RejectedLink, ResolveOptions, ResolvedLinks};
use crate::validate;

/// Split `links` into outgoing and incoming views relative to `focal_event_id`.
///
/// Fails only when the focal id is empty or `options.min_score` is NaN.
/// Malformed links are returned in `rejected`; links touching neither
/// endpoint are ignored.
pub fn resolve(
    focal_event_id: &str,
    links: &[EvolutionLink],
    options: &ResolveOptions,
) -> Result<ResolvedLinks> {
    resolve_with_event(focal_event_id, None, links, options)
}

/// Like [`resolve`], also collecting the focal event's related entities.
pub fn resolve_for_event(
    focal_event: &Event,
    links: &[EvolutionLink],
    options: &ResolveOptions,
) -> Result<ResolvedLinks> {
    resolve_with_event(focal_event.event_id.as_str(), Some(focal_event), links, options)
}

/// Shared entry point. A supplied `focal_event` must carry `focal_event_id`.
pub fn resolve_with_event(
    focal_event_id: &str,
    focal_event: Option<&Event>,
    links: &[EvolutionLink],
    options: &ResolveOptions,
) -> Result<ResolvedLinks> {
    if focal_event_id.trim().is_empty() {
        return Err(EvolutionError::InvalidArgument(
            "focal event id must not be empty".to_string(),
        ));
    }
    if options.min_score.is_nan() {
        return Err(EvolutionError::InvalidArgument(
            "min_score must be a number".to_string(),
        ));
    }
    if let Some(event) = focal_event {
        if event.event_id != *focal_event_id {
            return Err(EvolutionError::InvalidArgument(format!(
                "focal event {} does not match focal id {focal_event_id}",
                event.event_id
            )));
        }
    }

    let mut rejected = Vec::new();
    let mut outgoing = Vec::new();
    let mut incoming = Vec::new();

    for link in links {
        if let Some(reason) = validate::check_link(link) {
            rejected.push(RejectedLink {
                link: link.clone(),
                reason,
            });
            continue;
        }

        if link.score < options.min_score {
            continue;
        }

        if link.from == *focal_event_id {
            outgoing.push(link);
        } else if link.to == *focal_event_id {
            incoming.push(link);
        }
    }

    rejected.sort_by(|a, b| a.link.canonical_cmp(&b.link));

    let (mut outgoing, outgoing_dups) = dedup_keep_highest(outgoing);
    let (mut incoming, incoming_dups) = dedup_keep_highest(incoming);

    sort_partition(&mut outgoing, focal_event_id, options.sort_descending_by_score);
    sort_partition(&mut incoming, focal_event_id, options.sort_descending_by_score);

    let counts = LinkCounts {
        outgoing_count: outgoing.len(),
        incoming_count: incoming.len(),
        rejected_count: rejected.len(),
        duplicates_dropped: outgoing_dups + incoming_dups,
    };

    if counts.rejected_count > 0 {
        tracing::warn!(
            focal_event_id,
            rejected = counts.rejected_count,
            "Rejected malformed evolution links"
        );
    }
    tracing::debug!(
        focal_event_id,
        input = links.len(),
        outgoing = counts.outgoing_count,
        incoming = counts.incoming_count,
        duplicates = counts.duplicates_dropped,
        "Resolved evolution links"
    );

    Ok(ResolvedLinks {
        focal_event_id: EventId::from(focal_event_id),
        outgoing: outgoing.into_iter().cloned().collect(),
        incoming: incoming.into_iter().cloned().collect(),
        rejected,
        counts,
        related_entity_ids: focal_event
            .map(Event::involved_entities)
            .unwrap_or_default(),
    })
}

/// Collapse links sharing `(from, to, type)`, keeping the highest score.
/// Equal scores keep the canonically smallest link. Returns survivors and the
/// number dropped.
fn dedup_keep_highest(links: Vec<&EvolutionLink>) -> (Vec<&EvolutionLink>, usize) {
    let mut kept: Vec<&EvolutionLink> = Vec::with_capacity(links.len());
    let mut index: HashMap<LinkKey<'_>, usize> = HashMap::with_capacity(links.len());
    let mut dropped = 0;

    for link in links {
        match index.entry(link.key()) {
            Entry::Occupied(slot) => {
                dropped += 1;
                let i = *slot.get();
                let replace = match link.score.total_cmp(&kept[i].score) {
                    Ordering::Greater => true,
                    Ordering::Equal => link.canonical_cmp(kept[i]).is_lt(),
                    Ordering::Less => false,
                };
                if replace {
                    kept[i] = link;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(link);
            }
        }
    }

    (kept, dropped)
}

/// Order by score, then by the endpoint that is not the focal event
/// (ascending in both directions), then by link type.
fn sort_partition(links: &mut [&EvolutionLink], focal_event_id: &str, descending: bool) {
    links.sort_by(|a, b| {
        let by_score = a.score.total_cmp(&b.score);
        let by_score = if descending { by_score.reverse() } else { by_score };
        by_score
            .then_with(|| opposing(a, focal_event_id).cmp(opposing(b, focal_event_id)))
            .then_with(|| a.link_type.cmp(&b.link_type))
    });
}

fn opposing<'a>(link: &'a EvolutionLink, focal_event_id: &str) -> &'a str {
    link.other_endpoint(focal_event_id)
        .map(EventId::as_str)
        .unwrap_or_default()
}

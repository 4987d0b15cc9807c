//! fekg-evolution: Evolution-link resolution for the FE-EKG knowledge graph.
//!
//! Given a focal event and directed, scored evolution links, splits them into
//! outgoing and incoming views, rejects malformed links with a reason,
//! collapses duplicates, and ranks each view by score. Also provides the
//! per-link score breakdown, presentation views, and an input fingerprint
//! for callers that memoize results.

pub mod breakdown;
pub mod commands;
pub mod error;
pub mod fingerprint;
pub mod resolve;
pub mod types;
pub mod validate;
pub mod views;

pub use breakdown::{score_breakdown, ScoreBreakdown};
pub use commands::{event_types, link_breakdowns, list_events, EventListing, LinkBreakdown};
pub use error::{EvolutionError, Result};
pub use resolve::{resolve, resolve_for_event, resolve_with_event};
pub use types::{LinkCounts, RejectedLink, RejectionReason, ResolveOptions, ResolvedLinks};
pub use views::{ConnectionsReport, Direction, EventSummary, LinkView};

use fekg_core::{Event, EventId, EvolutionLink, FekgConfig};
use fekg_store::{EventRepository, LinkQuery, LinkRepository, StoreError};

/// Resolver carrying default options, typically built from configuration.
#[derive(Debug, Clone, Default)]
pub struct EvolutionLinkResolver {
    options: ResolveOptions,
}

impl EvolutionLinkResolver {
    /// Create a resolver with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take defaults from the `[evolution]` config section.
    pub fn from_config(config: &FekgConfig) -> Self {
        Self {
            options: ResolveOptions::from(&config.evolution),
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.options.min_score = min_score;
        self
    }

    pub fn with_sort_descending(mut self, descending: bool) -> Self {
        self.options.sort_descending_by_score = descending;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn resolve(&self, focal_event_id: &str, links: &[EvolutionLink]) -> Result<ResolvedLinks> {
        resolve::resolve(focal_event_id, links, &self.options)
    }

    pub fn resolve_for_event(
        &self,
        focal_event: &Event,
        links: &[EvolutionLink],
    ) -> Result<ResolvedLinks> {
        resolve::resolve_for_event(focal_event, links, &self.options)
    }

    /// Fetch the focal event and its links from a repository, then resolve.
    ///
    /// Every link touching the focal event is fetched regardless of score so
    /// malformed ones reach `rejected`; `link_min_score` is then applied after
    /// validation as a floor under the resolver's own `min_score`.
    ///
    /// The event itself is optional: when the repository does not know it,
    /// links are still resolved, just without related entities.
    pub fn resolve_from_store<R>(
        &self,
        store: &R,
        focal_event_id: &EventId,
        link_min_score: f64,
    ) -> Result<ResolvedLinks>
    where
        R: EventRepository + LinkRepository,
    {
        let links = self.links_from_store(store, focal_event_id)?;
        let options = self.floored_options(link_min_score);

        match store.get_event(focal_event_id) {
            Ok(event) => resolve::resolve_for_event(&event, &links, &options),
            Err(StoreError::NotFound { .. }) => {
                tracing::info!(
                    event_id = %focal_event_id,
                    "Focal event not in repository; resolving links only"
                );
                resolve::resolve(focal_event_id.as_str(), &links, &options)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fingerprint of a request under this resolver's options.
    pub fn fingerprint(&self, focal_event_id: &str, links: &[EvolutionLink]) -> Result<String> {
        fingerprint::fingerprint(focal_event_id, links, &self.options)
    }

    /// Fingerprint of exactly the inputs [`Self::resolve_from_store`] would see.
    pub fn fingerprint_from_store<R>(
        &self,
        store: &R,
        focal_event_id: &EventId,
        link_min_score: f64,
    ) -> Result<String>
    where
        R: LinkRepository,
    {
        let links = self.links_from_store(store, focal_event_id)?;
        fingerprint::fingerprint(
            focal_event_id.as_str(),
            &links,
            &self.floored_options(link_min_score),
        )
    }

    fn links_from_store<R: LinkRepository>(
        &self,
        store: &R,
        focal_event_id: &EventId,
    ) -> Result<Vec<EvolutionLink>> {
        if focal_event_id.is_blank() {
            return Err(EvolutionError::InvalidArgument(
                "focal event id must not be empty".to_string(),
            ));
        }
        let query = LinkQuery::for_event(focal_event_id.clone()).any_score();
        Ok(store.list_links(&query)?)
    }

    /// Options with `min_score` raised to `floor`. A NaN on either side is
    /// left for `resolve` to report.
    fn floored_options(&self, floor: f64) -> ResolveOptions {
        let mut options = self.options;
        if floor > options.min_score {
            options.min_score = floor;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fekg_core::EventType;
    use fekg_store::{Snapshot, SnapshotStore};

    fn store() -> SnapshotStore {
        let mut lehman = Event::new("evt_001", "Lehman Brothers files for bankruptcy", EventType::Bankruptcy, "2008-09-15");
        lehman.actors = Some(vec!["Lehman Brothers".into()]);
        lehman.targets = Some(vec!["Barclays".into()]);

        SnapshotStore::new(Snapshot {
            events: vec![lehman],
            evolution_links: vec![
                EvolutionLink::new("evt_004", "evt_001", 0.82),
                EvolutionLink::new("evt_001", "evt_003", 0.74),
                EvolutionLink::new("evt_006", "evt_001", 0.2),
                EvolutionLink::new("evt_006", "evt_003", 0.9),
            ],
        })
    }

    #[test]
    fn test_builder_options() {
        let resolver = EvolutionLinkResolver::new()
            .with_min_score(0.4)
            .with_sort_descending(false);
        assert_eq!(resolver.options().min_score, 0.4);
        assert!(!resolver.options().sort_descending_by_score);
    }

    #[test]
    fn test_from_config() {
        let config = FekgConfig::from_toml_str("[evolution]\nmin_score = 0.6\n").unwrap();
        let resolver = EvolutionLinkResolver::from_config(&config);
        assert_eq!(resolver.options().min_score, 0.6);
        assert!(resolver.options().sort_descending_by_score);
    }

    #[test]
    fn test_resolve_from_store_with_known_event() {
        let resolved = EvolutionLinkResolver::new()
            .resolve_from_store(&store(), &EventId::from("evt_001"), 0.3)
            .unwrap();

        assert_eq!(resolved.counts.outgoing_count, 1);
        assert_eq!(resolved.counts.incoming_count, 1);
        assert_eq!(resolved.related_entity_ids, vec!["Lehman Brothers", "Barclays"]);
    }

    #[test]
    fn test_resolve_from_store_unknown_event_still_resolves() {
        let resolved = EvolutionLinkResolver::new()
            .resolve_from_store(&store(), &EventId::from("evt_003"), 0.0)
            .unwrap();

        assert_eq!(resolved.counts.incoming_count, 2);
        assert_eq!(resolved.incoming[0].from, EventId::from("evt_006"));
        assert!(resolved.related_entity_ids.is_empty());
    }

    #[test]
    fn test_resolve_from_store_rejects_out_of_range_below_floor() {
        let store = SnapshotStore::new(Snapshot {
            events: Vec::new(),
            evolution_links: vec![
                EvolutionLink::new("E1", "E2", -0.2),
                EvolutionLink::new("E1", "E3", 0.2),
                EvolutionLink::new("E1", "E4", 0.5),
            ],
        });

        let resolved = EvolutionLinkResolver::new()
            .with_min_score(0.0)
            .resolve_from_store(&store, &EventId::from("E1"), 0.3)
            .unwrap();
        assert_eq!(resolved.counts.rejected_count, 1);
        assert_eq!(
            resolved.rejected[0].reason,
            RejectionReason::ScoreOutOfRange { value: -0.2 }
        );
        assert_eq!(resolved.counts.outgoing_count, 1);
        assert_eq!(resolved.outgoing[0].to, EventId::from("E4"));

        let unfloored = EvolutionLinkResolver::new()
            .resolve_from_store(&store, &EventId::from("E1"), 0.0)
            .unwrap();
        assert_eq!(unfloored.counts.outgoing_count, 2);
        assert_eq!(unfloored.counts.rejected_count, 1);
    }

    #[test]
    fn test_resolver_min_score_above_floor_wins() {
        let resolved = EvolutionLinkResolver::new()
            .with_min_score(0.8)
            .resolve_from_store(&store(), &EventId::from("evt_001"), 0.3)
            .unwrap();
        assert_eq!(resolved.counts.incoming_count, 1);
        assert_eq!(resolved.counts.outgoing_count, 0);
    }

    #[test]
    fn test_fingerprint_from_store_matches_direct_inputs() {
        let resolver = EvolutionLinkResolver::new();
        let from_store = resolver
            .fingerprint_from_store(&store(), &EventId::from("evt_001"), 0.3)
            .unwrap();

        let links = vec![
            EvolutionLink::new("evt_004", "evt_001", 0.82),
            EvolutionLink::new("evt_001", "evt_003", 0.74),
            EvolutionLink::new("evt_006", "evt_001", 0.2),
        ];
        let options = ResolveOptions {
            min_score: 0.3,
            ..ResolveOptions::default()
        };
        assert_eq!(
            from_store,
            fingerprint::fingerprint("evt_001", &links, &options).unwrap()
        );
    }

    #[test]
    fn test_resolve_from_store_blank_id() {
        let err = EvolutionLinkResolver::new()
            .resolve_from_store(&store(), &EventId::from(""), 0.3)
            .unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidArgument(_)));
    }
}

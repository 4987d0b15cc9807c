//! Repository contracts for the knowledge graph's event and link collections.

use fekg_core::{Event, EventId, EvolutionLink, Page};

use crate::error::Result;

/// Default minimum score for link listings, matching the backend's own default.
pub const DEFAULT_LINK_MIN_SCORE: f64 = 0.3;

/// Source of `Event` records.
pub trait EventRepository {
    /// Look up a single event. Fails with `NotFound` when absent.
    fn get_event(&self, event_id: &EventId) -> Result<Event>;

    /// One page of events in repository order.
    fn list_events(&self, offset: usize, limit: usize) -> Result<Page<Event>>;

    /// Events whose label or description contains `query`, case-insensitively.
    fn search_events(&self, query: &str) -> Result<Vec<Event>>;

    /// Every event, for building type filters and endpoint lookups.
    fn all_events(&self) -> Result<Vec<Event>>;
}

/// Parameters for a link listing, mirroring
/// `GET evolution-links?event_id=<id>&min_score=<m>`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkQuery {
    /// Only links touching this event (either endpoint).
    pub event_id: Option<EventId>,
    /// Only links with `score >= min_score`.
    pub min_score: f64,
}

impl Default for LinkQuery {
    fn default() -> Self {
        Self {
            event_id: None,
            min_score: DEFAULT_LINK_MIN_SCORE,
        }
    }
}

impl LinkQuery {
    pub fn for_event(event_id: impl Into<EventId>) -> Self {
        Self {
            event_id: Some(event_id.into()),
            ..Self::default()
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Drop the score floor so every link touching the event is returned,
    /// including ones whose score is out of range or not a number.
    pub fn any_score(mut self) -> Self {
        self.min_score = f64::NEG_INFINITY;
        self
    }

    /// Whether a link would be returned by this query.
    ///
    /// This is a listing filter only; links are not validated here.
    pub fn matches(&self, link: &EvolutionLink) -> bool {
        if link.score < self.min_score {
            return false;
        }
        match &self.event_id {
            Some(id) => link.from == *id || link.to == *id,
            None => true,
        }
    }
}

/// Source of `EvolutionLink` records.
pub trait LinkRepository {
    fn list_links(&self, query: &LinkQuery) -> Result<Vec<EvolutionLink>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_uses_backend_min_score() {
        let q = LinkQuery::default();
        assert!(q.event_id.is_none());
        assert!((q.min_score - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_query_matches_either_endpoint() {
        let q = LinkQuery::for_event("evt_001").with_min_score(0.0);
        assert!(q.matches(&EvolutionLink::new("evt_001", "evt_003", 0.5)));
        assert!(q.matches(&EvolutionLink::new("evt_006", "evt_001", 0.5)));
        assert!(!q.matches(&EvolutionLink::new("evt_002", "evt_003", 0.5)));
    }

    #[test]
    fn test_query_min_score_is_inclusive() {
        let q = LinkQuery::default().with_min_score(0.5);
        assert!(q.matches(&EvolutionLink::new("a", "b", 0.5)));
        assert!(!q.matches(&EvolutionLink::new("a", "b", 0.49)));
    }

    #[test]
    fn test_any_score_keeps_out_of_range_scores() {
        let q = LinkQuery::for_event("a").any_score();
        assert!(q.matches(&EvolutionLink::new("a", "b", -0.2)));
        assert!(q.matches(&EvolutionLink::new("c", "a", f64::NAN)));
        assert!(q.matches(&EvolutionLink::new("a", "b", 0.0)));
        assert!(!q.matches(&EvolutionLink::new("b", "c", 0.9)));
    }

    #[test]
    fn test_query_passes_invalid_links_through() {
        let q = LinkQuery::default();
        assert!(q.matches(&EvolutionLink::new("a", "a", 0.9)));
        assert!(q.matches(&EvolutionLink::new("a", "b", 1.4)));
    }
}

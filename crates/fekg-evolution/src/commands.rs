//! Repository-backed operations behind the `breakdown` and `events`
//! subcommands. `resolve` and `fingerprint` go through
//! [`EvolutionLinkResolver`](crate::EvolutionLinkResolver) directly.

use serde::Serialize;

use fekg_core::config::ListingConfig;
use fekg_core::filter::distinct_event_types;
use fekg_core::{paginate, Event, EventFilter, EventId, EventType, Page};
use fekg_store::{EventRepository, LinkQuery, LinkRepository};

use crate::breakdown::{score_breakdown, ScoreBreakdown};
use crate::error::Result;

/// One row of `breakdown` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBreakdown {
    pub from: EventId,
    pub to: EventId,
    pub score: f64,
    #[serde(rename = "type")]
    pub link_type: String,
    pub breakdown: ScoreBreakdown,
}

/// Breakdown of every stored link, or of those touching `event_id`.
///
/// No score floor and no validation: this is a raw view of the data.
pub fn link_breakdowns<R: LinkRepository>(
    store: &R,
    event_id: Option<&EventId>,
) -> Result<Vec<LinkBreakdown>> {
    let query = LinkQuery {
        event_id: event_id.cloned(),
        ..LinkQuery::default()
    }
    .any_score();

    let rows = store
        .list_links(&query)?
        .into_iter()
        .map(|link| LinkBreakdown {
            breakdown: score_breakdown(&link),
            from: link.from,
            to: link.to,
            score: link.score,
            link_type: link.link_type,
        })
        .collect();
    Ok(rows)
}

/// Criteria of an `events` listing as given on the command line.
///
/// Date bounds are `YYYY-MM-DD`; an empty string leaves the bound open.
#[derive(Debug, Clone, Default)]
pub struct EventListing {
    pub offset: usize,
    pub limit: Option<usize>,
    pub types: Vec<String>,
    pub from: String,
    pub to: String,
    pub search: Option<String>,
}

impl EventListing {
    fn filter(&self) -> Result<EventFilter> {
        let mut filter = EventFilter::new()
            .with_date_range(&self.from, &self.to)?
            .with_event_types(self.types.iter().map(|t| EventType::from(t.as_str())));
        if let Some(q) = &self.search {
            filter = filter.with_search(q.as_str());
        }
        Ok(filter)
    }
}

/// Filter then paginate the repository's events.
pub fn list_events<R: EventRepository>(
    store: &R,
    listing: &EventListing,
    config: &ListingConfig,
) -> Result<Page<Event>> {
    let filter = listing.filter()?;
    let events = store.all_events()?;
    let matched = filter.apply(&events);
    let page = paginate(&matched, listing.offset, config.page_size(listing.limit));

    tracing::info!(
        filtered = filter.is_active(),
        matched = matched.len(),
        returned = page.data.len(),
        "Listed events"
    );
    Ok(page)
}

/// Distinct kinds present in the repository, sorted by name.
pub fn event_types<R: EventRepository>(store: &R) -> Result<Vec<EventType>> {
    Ok(distinct_event_types(&store.all_events()?))
}

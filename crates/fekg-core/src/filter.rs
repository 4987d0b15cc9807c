//! Client-side filtering and pagination over already-fetched events.
//!
//! The graph backend has no server-side filters for the event list, so
//! callers fetch a collection once and narrow it here. Filters never
//! reorder their input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FekgError, Result};
use crate::types::{Event, EventType};

/// Criteria for narrowing an event collection. Every field is optional;
/// an empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Allowed kinds; empty means all kinds.
    pub event_types: Vec<EventType>,
    /// Case-insensitive substring of label or description.
    pub search_query: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date range from `YYYY-MM-DD` strings. Empty strings clear a bound.
    pub fn with_date_range(mut self, start: &str, end: &str) -> Result<Self> {
        self.start_date = parse_bound(start)?;
        self.end_date = parse_bound(end)?;
        if let (Some(s), Some(e)) = (self.start_date, self.end_date) {
            if s > e {
                return Err(FekgError::InvalidArgument(format!(
                    "start date {s} is after end date {e}"
                )));
            }
        }
        Ok(self)
    }

    pub fn with_event_types(mut self, types: impl IntoIterator<Item = EventType>) -> Self {
        self.event_types = types.into_iter().collect();
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Whether any criterion would exclude an event.
    pub fn is_active(&self) -> bool {
        self.start_date.is_some()
            || self.end_date.is_some()
            || !self.event_types.is_empty()
            || self.normalized_query().is_some()
    }

    pub fn matches(&self, event: &Event) -> bool {
        if !self.event_types.is_empty() && !self.event_types.contains(&event.event_type) {
            return false;
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(date) = event_date(event) else {
                return false;
            };
            if self.start_date.is_some_and(|s| date < s) {
                return false;
            }
            if self.end_date.is_some_and(|e| date > e) {
                return false;
            }
        }

        if let Some(query) = self.normalized_query() {
            let in_label = event.label.to_lowercase().contains(&query);
            let in_description = event
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query));
            if !in_label && !in_description {
                return false;
            }
        }

        true
    }

    /// Events matching every criterion, in input order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }

    fn normalized_query(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

fn parse_bound(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| FekgError::InvalidArgument(format!("invalid date '{raw}': {e}")))
}

/// Calendar date of an event, read from the leading `YYYY-MM-DD` of its
/// date string. Time and zone suffixes are ignored.
pub fn event_date(event: &Event) -> Option<NaiveDate> {
    let head = event.date.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Distinct event kinds present in a collection, sorted by name.
pub fn distinct_event_types(events: &[Event]) -> Vec<EventType> {
    let mut types: Vec<EventType> = Vec::new();
    for event in events {
        if !types.contains(&event.event_type) {
            types.push(event.event_type.clone());
        }
    }
    types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    types
}

/// One page of a larger collection, shaped like the backend's paginated response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Size of the whole collection, not of this page.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.data.len()) < self.total
    }
}

/// Slice `[offset, offset + limit)` out of `items`, clamped to the collection.
pub fn paginate<T: Clone>(items: &[T], offset: usize, limit: usize) -> Page<T> {
    let start = offset.min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    Page {
        data: items[start..end].to_vec(),
        total: items.len(),
        offset,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn sample_events() -> Vec<Event> {
        let mut lehman = Event::new(
            "evt_001",
            "Lehman Brothers files for bankruptcy",
            EventType::Bankruptcy,
            "2008-09-15",
        );
        lehman.severity = Some(Severity::High);
        lehman.description =
            Some("Lehman Brothers filed for Chapter 11 bankruptcy protection".into());

        let mut bear = Event::new(
            "evt_002",
            "Bear Stearns acquisition by JP Morgan",
            EventType::Merger,
            "2008-03-16",
        );
        bear.description = Some("JP Morgan Chase acquired Bear Stearns for $2 per share".into());

        let aig = Event::new(
            "evt_003",
            "AIG receives government bailout",
            EventType::Bailout,
            "2008-09-16T00:00:00Z",
        );

        let undated = Event::new("evt_004", "Undated rumour", EventType::from("Rumour"), "");

        vec![lehman, bear, aig, undated]
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.event_id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let events = sample_events();
        let filter = EventFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&events), events);
    }

    #[test]
    fn test_type_filter() {
        let events = sample_events();
        let filter = EventFilter::new().with_event_types([EventType::Merger, EventType::Bailout]);
        assert_eq!(ids(&filter.apply(&events)), vec!["evt_002", "evt_003"]);
    }

    #[test]
    fn test_date_range_inclusive_and_drops_undated() {
        let events = sample_events();
        let filter = EventFilter::new()
            .with_date_range("2008-09-15", "2008-09-16")
            .unwrap();
        assert_eq!(ids(&filter.apply(&events)), vec!["evt_001", "evt_003"]);
    }

    #[test]
    fn test_open_ended_date_range() {
        let events = sample_events();
        let filter = EventFilter::new().with_date_range("", "2008-06-01").unwrap();
        assert_eq!(ids(&filter.apply(&events)), vec!["evt_002"]);
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let err = EventFilter::new()
            .with_date_range("2008-12-01", "2008-01-01")
            .unwrap_err();
        assert!(matches!(err, FekgError::InvalidArgument(_)));
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(EventFilter::new().with_date_range("15/09/2008", "").is_err());
    }

    #[test]
    fn test_search_matches_label_or_description() {
        let events = sample_events();

        let by_label = EventFilter::new().with_search("LEHMAN");
        assert_eq!(ids(&by_label.apply(&events)), vec!["evt_001"]);

        let by_description = EventFilter::new().with_search("chase");
        assert_eq!(ids(&by_description.apply(&events)), vec!["evt_002"]);
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let filter = EventFilter::new().with_search("   ");
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&sample_events()).len(), 4);
    }

    #[test]
    fn test_distinct_event_types_sorted() {
        let types = distinct_event_types(&sample_events());
        let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["Bailout", "Bankruptcy", "Merger", "Rumour"]);
    }

    #[test]
    fn test_paginate_slices_and_reports_total() {
        let items: Vec<u32> = (0..10).collect();

        let page = paginate(&items, 4, 3);
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.total, 10);
        assert!(page.has_more());

        let tail = paginate(&items, 8, 5);
        assert_eq!(tail.data, vec![8, 9]);
        assert!(!tail.has_more());
    }

    #[test]
    fn test_paginate_past_end_and_zero_limit() {
        let items: Vec<u32> = (0..3).collect();
        assert!(paginate(&items, 10, 5).data.is_empty());
        assert!(paginate(&items, 0, 0).data.is_empty());
        assert_eq!(paginate(&items, 10, 5).total, 3);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn page_total_is_collection_len(
                len in 0usize..200,
                offset in 0usize..300,
                limit in 0usize..300,
            ) {
                let items: Vec<usize> = (0..len).collect();
                let page = paginate(&items, offset, limit);
                prop_assert_eq!(page.total, len);
                prop_assert!(page.data.len() <= limit);
                if let Some(first) = page.data.first() {
                    prop_assert_eq!(*first, offset);
                }
            }

            #[test]
            fn filter_preserves_order(query in "[a-z]{0,3}") {
                let events = sample_events();
                let kept = EventFilter::new().with_search(query).apply(&events);
                let positions: Vec<usize> = kept
                    .iter()
                    .map(|k| events.iter().position(|e| e.event_id == k.event_id).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}

//! Presentation-ready projections of resolved links.
//!
//! A list item needs the opposing endpoint, the aggregate score, and the
//! available breakdown; the endpoint is resolved to a label and date when the
//! event is known, falling back to the bare id otherwise.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fekg_core::{Event, EventId, EvolutionLink};

use crate::breakdown::{score_breakdown, ScoreBreakdown};
use crate::types::{LinkCounts, ResolvedLinks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The focal event evolved into the other event.
    Outgoing,
    /// The other event evolved into the focal event.
    Incoming,
}

/// One link as seen from the focal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkView {
    pub direction: Direction,
    pub other_event_id: EventId,
    pub score: f64,
    pub link_type: String,
    pub breakdown: ScoreBreakdown,
}

impl LinkView {
    /// `None` when the link does not touch `focal_event_id`.
    pub fn from_link(focal_event_id: &str, link: &EvolutionLink) -> Option<Self> {
        let (direction, other) = if link.from == *focal_event_id {
            (Direction::Outgoing, &link.to)
        } else if link.to == *focal_event_id {
            (Direction::Incoming, &link.from)
        } else {
            return None;
        };

        Some(Self {
            direction,
            other_event_id: other.clone(),
            score: link.score,
            link_type: link.link_type.clone(),
            breakdown: score_breakdown(link),
        })
    }
}

/// Minimal event card: what a list item shows for a linked event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: EventId,
    pub label: String,
    pub date: String,
}

impl EventSummary {
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.event_id.clone(),
            label: event.label.clone(),
            date: event.date.clone(),
        }
    }

    /// Summary for `event_id`; unknown events show their id as the label.
    pub fn lookup(events: &HashMap<EventId, Event>, event_id: &EventId) -> Self {
        match events.get(event_id) {
            Some(event) => Self::from_event(event),
            None => Self {
                event_id: event_id.clone(),
                label: event_id.to_string(),
                date: String::new(),
            },
        }
    }
}

impl ResolvedLinks {
    pub fn outgoing_views(&self) -> Vec<LinkView> {
        self.views_of(&self.outgoing)
    }

    pub fn incoming_views(&self) -> Vec<LinkView> {
        self.views_of(&self.incoming)
    }

    /// Both directions in one list: highest score first, then by the other
    /// endpoint id, outgoing before incoming on a full tie.
    pub fn merged_views(&self) -> Vec<LinkView> {
        let mut merged = self.outgoing_views();
        merged.extend(self.incoming_views());
        merged.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.other_event_id.cmp(&b.other_event_id))
                .then_with(|| direction_rank(a.direction).cmp(&direction_rank(b.direction)))
        });
        merged
    }

    fn views_of(&self, links: &[EvolutionLink]) -> Vec<LinkView> {
        links
            .iter()
            .filter_map(|l| LinkView::from_link(self.focal_event_id.as_str(), l))
            .collect()
    }
}

fn direction_rank(direction: Direction) -> u8 {
    match direction {
        Direction::Outgoing => 0,
        Direction::Incoming => 1,
    }
}

/// A link view joined with the linked event's summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEvent {
    pub event: EventSummary,
    #[serde(flatten)]
    pub link: LinkView,
}

/// Everything a connections panel renders for one focal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionsReport {
    pub focal: EventSummary,
    pub outgoing: Vec<LinkedEvent>,
    pub incoming: Vec<LinkedEvent>,
    pub related_entity_ids: Vec<String>,
    pub counts: LinkCounts,
}

impl ConnectionsReport {
    pub fn build(resolved: &ResolvedLinks, events: &HashMap<EventId, Event>) -> Self {
        let join = |views: Vec<LinkView>| -> Vec<LinkedEvent> {
            views
                .into_iter()
                .map(|link| LinkedEvent {
                    event: EventSummary::lookup(events, &link.other_event_id),
                    link,
                })
                .collect()
        };

        Self {
            focal: EventSummary::lookup(events, &resolved.focal_event_id),
            outgoing: join(resolved.outgoing_views()),
            incoming: join(resolved.incoming_views()),
            related_entity_ids: resolved.related_entity_ids.clone(),
            counts: resolved.counts,
        }
    }

    /// Whether a warning should be shown for malformed input links.
    pub fn has_warnings(&self) -> bool {
        self.counts.rejected_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fekg_core::{EventType, ScoreComponent};

    use crate::resolve::resolve;
    use crate::types::ResolveOptions;

    fn sample() -> ResolvedLinks {
        let links = vec![
            EvolutionLink::new("evt_001", "evt_003", 0.74)
                .with_component(ScoreComponent::Temporal, 0.95),
            EvolutionLink::new("evt_004", "evt_001", 0.82)
                .with_component(ScoreComponent::Causality, 0.6),
            EvolutionLink::new("evt_006", "evt_001", 0.74),
            EvolutionLink::new("evt_001", "evt_001", 0.5),
        ];
        resolve("evt_001", &links, &ResolveOptions::default()).unwrap()
    }

    fn events() -> HashMap<EventId, Event> {
        [
            Event::new("evt_001", "Lehman Brothers files for bankruptcy", EventType::Bankruptcy, "2008-09-15"),
            Event::new("evt_004", "Credit rating downgrade", EventType::CreditDowngrade, "2008-09-10"),
        ]
        .into_iter()
        .map(|e| (e.event_id.clone(), e))
        .collect()
    }

    #[test]
    fn test_link_view_direction_and_other_endpoint() {
        let link = EvolutionLink::new("A", "B", 0.5);
        let out = LinkView::from_link("A", &link).unwrap();
        assert_eq!(out.direction, Direction::Outgoing);
        assert_eq!(out.other_event_id, EventId::from("B"));

        let inc = LinkView::from_link("B", &link).unwrap();
        assert_eq!(inc.direction, Direction::Incoming);
        assert_eq!(inc.other_event_id, EventId::from("A"));

        assert!(LinkView::from_link("C", &link).is_none());
    }

    #[test]
    fn test_views_carry_breakdown() {
        let resolved = sample();
        let outgoing = resolved.outgoing_views();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].breakdown.get(ScoreComponent::Temporal), Some(0.95));

        let incoming = resolved.incoming_views();
        assert_eq!(incoming[0].other_event_id, EventId::from("evt_004"));
        assert!(incoming[1].breakdown.is_empty());
    }

    #[test]
    fn test_merged_views_order() {
        let merged = sample().merged_views();
        let order: Vec<(&str, Direction)> = merged
            .iter()
            .map(|v| (v.other_event_id.as_str(), v.direction))
            .collect();
        assert_eq!(
            order,
            vec![
                ("evt_004", Direction::Incoming),
                ("evt_003", Direction::Outgoing),
                ("evt_006", Direction::Incoming),
            ]
        );
    }

    #[test]
    fn test_lookup_falls_back_to_id() {
        let summary = EventSummary::lookup(&events(), &EventId::from("evt_777"));
        assert_eq!(summary.label, "evt_777");
        assert_eq!(summary.date, "");
    }

    #[test]
    fn test_connections_report() {
        let report = ConnectionsReport::build(&sample(), &events());
        assert_eq!(report.focal.label, "Lehman Brothers files for bankruptcy");
        assert_eq!(report.outgoing.len(), 1);
        assert_eq!(report.outgoing[0].event.label, "evt_003");
        assert_eq!(report.incoming[0].event.label, "Credit rating downgrade");
        assert_eq!(report.incoming[0].event.date, "2008-09-10");
        assert!(report.has_warnings());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["incoming"][0]["other_event_id"], "evt_004");
        assert_eq!(json["incoming"][0]["breakdown"]["causality"], 0.6);
    }
}

//! In-memory repository over a JSON snapshot of backend responses.
//!
//! Accepted document shapes:
//! - `{ "events": [...], "evolution_links": [...] }` (either key optional)
//! - `{ "data": [...] }`, the backend's response envelope, holding events or links
//! - a bare JSON array of events or links

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use fekg_core::{paginate, Event, EventFilter, EventId, EvolutionLink, Page};

use crate::error::{Result, StoreError};
use crate::repository::{EventRepository, LinkQuery, LinkRepository};

/// Events and links as fetched from the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default, alias = "links")]
    pub evolution_links: Vec<EvolutionLink>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Self::from_items(items),
            Value::Object(mut map) => {
                if let Some(data) = map.remove("data") {
                    return match data {
                        Value::Array(items) => Self::from_items(items),
                        other => Err(StoreError::Parse(format!(
                            "expected 'data' to be an array, found {}",
                            json_kind(&other)
                        ))),
                    };
                }
                serde_json::from_value(Value::Object(map))
                    .map_err(|e| StoreError::Parse(e.to_string()))
            }
            other => Err(StoreError::Parse(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// A homogeneous array is either all events or all links, decided by the
    /// first element's fields.
    fn from_items(items: Vec<Value>) -> Result<Self> {
        let Some(first) = items.first() else {
            return Ok(Self::default());
        };

        let parse_err = |e: serde_json::Error| StoreError::Parse(e.to_string());
        if first.get("eventId").is_some() {
            let events = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<Event>, _>>()
                .map_err(parse_err)?;
            Ok(Self {
                events,
                evolution_links: Vec::new(),
            })
        } else if first.get("from").is_some() {
            let evolution_links = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<EvolutionLink>, _>>()
                .map_err(parse_err)?;
            Ok(Self {
                events: Vec::new(),
                evolution_links,
            })
        } else {
            Err(StoreError::Parse(
                "array items are neither events (eventId) nor links (from/to)".to_string(),
            ))
        }
    }

    /// Append another snapshot's records.
    pub fn merge(mut self, other: Snapshot) -> Self {
        self.events.extend(other.events);
        self.evolution_links.extend(other.evolution_links);
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-only repository serving a loaded `Snapshot`.
///
/// Immutable after construction, so it can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    events: Vec<Event>,
    links: Vec<EvolutionLink>,
    /// Map from event id → position in `events`. First occurrence wins.
    event_index: HashMap<EventId, usize>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut event_index = HashMap::with_capacity(snapshot.events.len());
        for (i, event) in snapshot.events.iter().enumerate() {
            event_index.entry(event.event_id.clone()).or_insert(i);
        }

        if event_index.len() < snapshot.events.len() {
            tracing::warn!(
                events = snapshot.events.len(),
                distinct = event_index.len(),
                "Snapshot contains duplicate event ids; keeping first occurrence"
            );
        }

        Self {
            events: snapshot.events,
            links: snapshot.evolution_links,
            event_index,
        }
    }

    /// Load a snapshot file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Snapshot::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            events = snapshot.events.len(),
            links = snapshot.evolution_links.len(),
            "Loaded snapshot"
        );
        Ok(Self::new(snapshot))
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Lookup table from id to event, for resolving link endpoints.
    pub fn events_by_id(&self) -> HashMap<EventId, Event> {
        self.event_index
            .iter()
            .map(|(id, &i)| (id.clone(), self.events[i].clone()))
            .collect()
    }
}

impl EventRepository for SnapshotStore {
    fn get_event(&self, event_id: &EventId) -> Result<Event> {
        self.event_index
            .get(event_id)
            .map(|&i| self.events[i].clone())
            .ok_or_else(|| StoreError::NotFound {
                event_id: event_id.to_string(),
            })
    }

    fn list_events(&self, offset: usize, limit: usize) -> Result<Page<Event>> {
        Ok(paginate(&self.events, offset, limit))
    }

    fn search_events(&self, query: &str) -> Result<Vec<Event>> {
        Ok(EventFilter::new().with_search(query).apply(&self.events))
    }

    fn all_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }
}

impl LinkRepository for SnapshotStore {
    fn list_links(&self, query: &LinkQuery) -> Result<Vec<EvolutionLink>> {
        let links: Vec<EvolutionLink> = self
            .links
            .iter()
            .filter(|l| query.matches(l))
            .cloned()
            .collect();
        tracing::debug!(
            event_id = ?query.event_id,
            min_score = query.min_score,
            returned = links.len(),
            "Listed evolution links"
        );
        Ok(links)
    }
}

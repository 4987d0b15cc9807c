//! Core domain types for the FE-EKG knowledge graph.
//!
//! These are read-only projections of what the graph backend returns: events
//! and the directed, scored evolution links between them. Field names follow
//! the backend's JSON so records deserialize straight from its responses;
//! unknown fields are ignored.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Events ────────────────────────────────────────────────────────

/// Stable identifier of an event in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for EventId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A financial event node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: EventId,
    pub label: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// ISO 8601 calendar date, kept verbatim.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Event {
    pub fn new(
        event_id: impl Into<EventId>,
        label: impl Into<String>,
        event_type: EventType,
        date: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            label: label.into(),
            event_type,
            date: date.into(),
            severity: None,
            actors: None,
            targets: None,
            description: None,
            source: None,
        }
    }

    /// Severity for display: an unset severity renders as `Low`.
    ///
    /// The stored `severity` keeps `None` so callers can still tell
    /// "not set" from "explicitly low".
    pub fn display_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Low)
    }

    /// Actors followed by targets, first occurrence wins, duplicates removed.
    pub fn involved_entities(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.actors
            .iter()
            .flatten()
            .chain(self.targets.iter().flatten())
            .filter(|e| seen.insert(*e))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Kind of financial event.
///
/// Kinds outside the known set are carried verbatim in `Other`, so an event
/// survives a deserialize / serialize cycle unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Bankruptcy,
    Merger,
    MergerFailure,
    Bailout,
    CreditDowngrade,
    MarketCrash,
    RegulatoryAction,
    LiquidityCrisis,
    FinancialLoss,
    RiskDisclosure,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bankruptcy => "Bankruptcy",
            Self::Merger => "Merger",
            Self::MergerFailure => "MergerFailure",
            Self::Bailout => "Bailout",
            Self::CreditDowngrade => "CreditDowngrade",
            Self::MarketCrash => "MarketCrash",
            Self::RegulatoryAction => "RegulatoryAction",
            Self::LiquidityCrisis => "LiquidityCrisis",
            Self::FinancialLoss => "FinancialLoss",
            Self::RiskDisclosure => "RiskDisclosure",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Bankruptcy" => Self::Bankruptcy,
            "Merger" => Self::Merger,
            "MergerFailure" => Self::MergerFailure,
            "Bailout" => Self::Bailout,
            "CreditDowngrade" => Self::CreditDowngrade,
            "MarketCrash" => Self::MarketCrash,
            "RegulatoryAction" => Self::RegulatoryAction,
            "LiquidityCrisis" => Self::LiquidityCrisis,
            "FinancialLoss" => Self::FinancialLoss,
            "RiskDisclosure" => Self::RiskDisclosure,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Evolution Links ───────────────────────────────────────────────

/// Link category the backend assigns to event evolution edges.
pub const EVOLVES_TO: &str = "evolves_to";

fn default_link_type() -> String {
    EVOLVES_TO.to_string()
}

/// A directed, scored assertion that `from` evolved into `to`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionLink {
    pub from: EventId,
    pub to: EventId,
    /// Aggregate evolution confidence, expected in `[0, 1]`.
    pub score: f64,
    #[serde(rename = "type", default = "default_link_type")]
    pub link_type: String,
    #[serde(flatten)]
    pub components: ComponentScores,
}

/// Identity of a logical link: `(from, to, type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub link_type: &'a str,
}

impl EvolutionLink {
    /// An `evolves_to` link with no component scores.
    pub fn new(from: impl Into<EventId>, to: impl Into<EventId>, score: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            score,
            link_type: default_link_type(),
            components: ComponentScores::default(),
        }
    }

    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = link_type.into();
        self
    }

    pub fn with_component(mut self, component: ScoreComponent, value: f64) -> Self {
        self.components.set(component, value);
        self
    }

    pub fn key(&self) -> LinkKey<'_> {
        LinkKey {
            from: self.from.as_str(),
            to: self.to.as_str(),
            link_type: &self.link_type,
        }
    }

    /// The endpoint that is not `focal`, if the link touches `focal` at all.
    pub fn other_endpoint(&self, focal: &str) -> Option<&EventId> {
        if self.from == *focal {
            Some(&self.to)
        } else if self.to == *focal {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Total order over every field: key, then score, then each component in
    /// canonical order (absent before present). Floats compare with
    /// `total_cmp`, so NaN and signed zeros still order deterministically.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.score.total_cmp(&other.score))
            .then_with(|| {
                ScoreComponent::ALL
                    .iter()
                    .map(|&c| cmp_component(self.components.get(c), other.components.get(c)))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

fn cmp_component(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Named sub-scores contributing to an aggregate evolution score.
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    Temporal,
    EntityOverlap,
    Semantic,
    Topic,
    Causality,
    Emotional,
}

impl ScoreComponent {
    pub const ALL: [ScoreComponent; 6] = [
        Self::Temporal,
        Self::EntityOverlap,
        Self::Semantic,
        Self::Topic,
        Self::Causality,
        Self::Emotional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temporal => "temporal",
            Self::EntityOverlap => "entity_overlap",
            Self::Semantic => "semantic",
            Self::Topic => "topic",
            Self::Causality => "causality",
            Self::Emotional => "emotional",
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional component scores. `None` means "not computed", never zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_overlap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional: Option<f64>,
}

impl ComponentScores {
    pub fn get(&self, component: ScoreComponent) -> Option<f64> {
        match component {
            ScoreComponent::Temporal => self.temporal,
            ScoreComponent::EntityOverlap => self.entity_overlap,
            ScoreComponent::Semantic => self.semantic,
            ScoreComponent::Topic => self.topic,
            ScoreComponent::Causality => self.causality,
            ScoreComponent::Emotional => self.emotional,
        }
    }

    pub fn set(&mut self, component: ScoreComponent, value: f64) {
        let slot = match component {
            ScoreComponent::Temporal => &mut self.temporal,
            ScoreComponent::EntityOverlap => &mut self.entity_overlap,
            ScoreComponent::Semantic => &mut self.semantic,
            ScoreComponent::Topic => &mut self.topic,
            ScoreComponent::Causality => &mut self.causality,
            ScoreComponent::Emotional => &mut self.emotional,
        };
        *slot = Some(value);
    }

    /// Present components in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (ScoreComponent, f64)> + '_ {
        ScoreComponent::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|v| (c, v)))
    }
}

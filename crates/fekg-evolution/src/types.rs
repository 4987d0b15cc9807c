//! Request and result types for evolution-link resolution.

use serde::{Deserialize, Serialize};

use fekg_core::config::EvolutionConfig;
use fekg_core::{EventId, EvolutionLink, ScoreComponent};

/// Knobs for a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Links with `score < min_score` are excluded from every view (default: 0.0).
    #[serde(default)]
    pub min_score: f64,
    /// Highest score first when true (default: true).
    #[serde(default = "default_true")]
    pub sort_descending_by_score: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            sort_descending_by_score: true,
        }
    }
}

impl From<&EvolutionConfig> for ResolveOptions {
    fn from(config: &EvolutionConfig) -> Self {
        Self {
            min_score: config.min_score,
            sort_descending_by_score: config.sort_descending,
        }
    }
}

/// Why a link was kept out of both views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// `from` or `to` is empty.
    MissingEndpoint,
    /// `from == to`.
    SelfLoop,
    /// Aggregate score outside `[0, 1]` or not a number.
    ScoreOutOfRange { value: f64 },
    /// A present component score outside `[0, 1]` or not a number.
    ComponentOutOfRange {
        component: ScoreComponent,
        value: f64,
    },
}

/// An input link that failed validation, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedLink {
    pub link: EvolutionLink,
    #[serde(flatten)]
    pub reason: RejectionReason,
}

/// Pre-computed sizes of each view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub outgoing_count: usize,
    pub incoming_count: usize,
    pub rejected_count: usize,
    /// Collapsed `(from, to, type)` duplicates across both partitions.
    pub duplicates_dropped: usize,
}

/// Links around a focal event, split by direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLinks {
    pub focal_event_id: EventId,
    /// Links whose `from` is the focal event.
    pub outgoing: Vec<EvolutionLink>,
    /// Links whose `to` is the focal event.
    pub incoming: Vec<EvolutionLink>,
    /// Invalid inputs, in canonical link order.
    pub rejected: Vec<RejectedLink>,
    pub counts: LinkCounts,
    /// Actors then targets of the focal event, when it was supplied.
    pub related_entity_ids: Vec<String>,
}

impl ResolvedLinks {
    pub fn has_rejections(&self) -> bool {
        self.counts.rejected_count > 0
    }

    /// True when neither direction has a link.
    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

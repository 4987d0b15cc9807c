//! Per-link component-score breakdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fekg_core::{EvolutionLink, ScoreComponent};

/// Present component scores of a link, keyed by component in canonical order.
///
/// Values are raw `[0, 1]` numbers; percentage formatting belongs to the caller.
/// The aggregate `score` is never part of the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown(pub BTreeMap<ScoreComponent, f64>);

impl ScoreBreakdown {
    pub fn get(&self, component: ScoreComponent) -> Option<f64> {
        self.0.get(&component).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreComponent, f64)> + '_ {
        self.0.iter().map(|(&c, &v)| (c, v))
    }
}

/// Breakdown of the components actually computed for `link`.
pub fn score_breakdown(link: &EvolutionLink) -> ScoreBreakdown {
    ScoreBreakdown(link.components.present().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_present_components() {
        let link = EvolutionLink::new("E1", "E2", 0.8)
            .with_component(ScoreComponent::Causality, 0.7)
            .with_component(ScoreComponent::Temporal, 0.0);

        let breakdown = score_breakdown(&link);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.get(ScoreComponent::Temporal), Some(0.0));
        assert_eq!(breakdown.get(ScoreComponent::Causality), Some(0.7));
        assert_eq!(breakdown.get(ScoreComponent::Semantic), None);
    }

    #[test]
    fn test_canonical_order() {
        let link = EvolutionLink::new("E1", "E2", 0.8)
            .with_component(ScoreComponent::Emotional, 0.1)
            .with_component(ScoreComponent::EntityOverlap, 0.2)
            .with_component(ScoreComponent::Temporal, 0.3);

        let order: Vec<ScoreComponent> = score_breakdown(&link).iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                ScoreComponent::Temporal,
                ScoreComponent::EntityOverlap,
                ScoreComponent::Emotional
            ]
        );
    }

    #[test]
    fn test_no_components_is_empty_not_zero() {
        let breakdown = score_breakdown(&EvolutionLink::new("E1", "E2", 0.8));
        assert!(breakdown.is_empty());
        assert_eq!(serde_json::to_string(&breakdown).unwrap(), "{}");
    }

    #[test]
    fn test_serializes_as_named_map_without_aggregate() {
        let link = EvolutionLink::new("E1", "E2", 0.8)
            .with_component(ScoreComponent::Semantic, 0.55)
            .with_component(ScoreComponent::Topic, 0.4);

        let json = serde_json::to_value(score_breakdown(&link)).unwrap();
        assert_eq!(json, serde_json::json!({"semantic": 0.55, "topic": 0.4}));
        assert!(json.get("score").is_none());
    }
}

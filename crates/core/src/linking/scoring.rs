//! Scoring for related-tool candidates

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::{ScoreFactor, ScoredCandidate};
use super::{
    LinkPopularityTracker, ALTERNATIVE_BONUS, COMPLEMENTARY_BONUS, CRITICAL_BOOST,
    OVERLINK_PENALTY, WORKFLOW_BONUS,
};
use crate::config::ValidatedLinking;
use crate::domain::item::{Catalog, Item, ItemId};
use crate::domain::relationship::{RelationKind, RelationshipGraph};

/// Weights for scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for a shared category (default: 0.40)
    pub same_category: f64,
    /// Weight for declared relationships (default: 0.30)
    pub workflow: f64,
    /// Weight for the under-link boost (default: 0.20)
    pub underlinked: f64,
    /// Weight for the popularity bonus (default: 0.10)
    pub popular: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.same_category + self.workflow + self.underlinked + self.popular
    }

    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("same_category", self.same_category),
            ("workflow", self.workflow),
            ("underlinked", self.underlinked),
            ("popular", self.popular),
        ]
    }
}

/// Inbound link-count thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkThresholds {
    pub orphan: u32,
    pub underlinked: u32,
    pub well_linked: u32,
    pub overlinked: u32,
}

impl Default for LinkThresholds {
    fn default() -> Self {
        super::DEFAULT_THRESHOLDS
    }
}

/// Scores (source, candidate) pairs from the catalog, relationship graph and
/// the current link-count snapshot. Never writes to the tracker.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<Catalog>,
    graph: Arc<RelationshipGraph>,
    tracker: Arc<LinkPopularityTracker>,
    weights: ScoringWeights,
    thresholds: LinkThresholds,
}

impl ScoringEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        graph: Arc<RelationshipGraph>,
        tracker: Arc<LinkPopularityTracker>,
        linking: &ValidatedLinking,
    ) -> Self {
        Self {
            catalog,
            graph,
            tracker,
            weights: *linking.weights(),
            thresholds: *linking.thresholds(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Score `target` as a related tool for `source`.
    ///
    /// Returns `None` for self-pairs, ids missing from the catalog, and
    /// candidates whose total is not positive.
    pub fn score(&self, source: &ItemId, target: &ItemId) -> Option<ScoredCandidate> {
        if source == target {
            return None;
        }
        let source = self.catalog.get(source)?;
        let target = self.catalog.get(target)?;
        self.evaluate(source, target).filter(|candidate| candidate.score > 0.0)
    }

    /// Score every catalog item except `source` and `exclude`, in catalog order.
    pub fn score_all(&self, source: &ItemId, exclude: &[ItemId]) -> Vec<ScoredCandidate> {
        let Some(source_item) = self.catalog.get(source) else {
            return Vec::new();
        };

        self.catalog
            .iter()
            .filter(|candidate| candidate.id != *source && !exclude.contains(&candidate.id))
            .filter_map(|candidate| self.evaluate(source_item, candidate))
            .filter(|candidate| candidate.score > 0.0)
            .collect()
    }

    fn evaluate(&self, source: &Item, target: &Item) -> Option<ScoredCandidate> {
        if source.id == target.id {
            return None;
        }

        let mut total = 0.0;
        let mut reasons = Vec::new();

        if source.shares_category_with(target) {
            total += self.weights.same_category * 100.0;
            reasons.push(ScoreFactor::CategoryMatch);
        }

        if let Some(kind) = self.graph.relation_to(&source.id, &target.id) {
            let multiplier = match kind {
                RelationKind::Workflow => WORKFLOW_BONUS,
                RelationKind::Complementary => COMPLEMENTARY_BONUS,
                RelationKind::Alternative => ALTERNATIVE_BONUS,
            };
            total += self.weights.workflow * multiplier;
            reasons.push(ScoreFactor::from_relation(kind));
        }

        let link_count = self.tracker.get(&target.id);
        if link_count < self.thresholds.underlinked {
            total += self.weights.underlinked * 100.0;
            reasons.push(ScoreFactor::UnderlinkBoost);

            if self.graph.needs_boost(&target.id) {
                total += self.weights.underlinked * CRITICAL_BOOST;
                reasons.push(ScoreFactor::CriticalBoost);
            }
        }

        if target.is_popular() {
            total += self.weights.popular * 100.0;
            reasons.push(ScoreFactor::PopularityBonus);
        }

        // Halves the whole accumulated score, relationship terms included.
        if link_count > self.thresholds.overlinked {
            total *= OVERLINK_PENALTY;
            reasons.push(ScoreFactor::OverlinkPenalty);
        }

        Some(ScoredCandidate { id: target.id.clone(), score: total, reasons })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{LinkThresholds, ScoringEngine, ScoringWeights};
    use crate::config::LinkingConfig;
    use crate::domain::item::{Catalog, Item, ItemId, ItemLabel};
    use crate::domain::relationship::{RelationshipEdge, RelationshipGraph};
    use crate::linking::{LinkPopularityTracker, ScoreFactor};

    fn id(raw: &str) -> ItemId {
        ItemId::parse(raw).expect("test id should be valid")
    }

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    /// Catalog {A: cat1, B: cat1, C: cat2}, A.workflow = [B].
    fn worked_example(b_needs_boost: bool, b_count: u32) -> ScoringEngine {
        let catalog = Catalog::new(vec![
            Item::new(id("a"), ["cat1"]),
            Item::new(id("b"), ["cat1"]),
            Item::new(id("c"), ["cat2"]),
        ])
        .expect("catalog should build");
        let graph = RelationshipGraph::from_entries([
            (id("a"), RelationshipEdge { workflow: vec![id("b")], ..RelationshipEdge::default() }),
            (id("b"), RelationshipEdge { needs_boost: b_needs_boost, ..RelationshipEdge::default() }),
        ]);
        let tracker = LinkPopularityTracker::new();
        tracker.set(id("a"), 5);
        tracker.set(id("b"), b_count);
        tracker.set(id("c"), 5);

        let linking = LinkingConfig {
            weights: ScoringWeights {
                same_category: 0.4,
                workflow: 0.3,
                underlinked: 0.2,
                popular: 0.1,
            },
            thresholds: LinkThresholds { orphan: 3, underlinked: 5, well_linked: 10, overlinked: 15 },
            ..LinkingConfig::default()
        }
        .validate()
        .expect("linking config should validate");

        ScoringEngine::new(Arc::new(catalog), Arc::new(graph), Arc::new(tracker), &linking)
    }

    #[test]
    fn worked_example_scores_ninety() {
        let engine = worked_example(false, 2);

        let scored = engine.score(&id("a"), &id("b")).expect("b should score");
        assert!(approx(scored.score, 90.0), "got {}", scored.score);
        assert_eq!(
            scored.reasons,
            vec![
                ScoreFactor::CategoryMatch,
                ScoreFactor::WorkflowRelation,
                ScoreFactor::UnderlinkBoost
            ]
        );
    }

    #[test]
    fn unrelated_candidate_scores_zero_and_is_dropped() {
        let engine = worked_example(false, 2);
        assert_eq!(engine.score(&id("a"), &id("c")), None);
    }

    #[test]
    fn boost_flag_adds_critical_boost() {
        let engine = worked_example(true, 2);

        let scored = engine.score(&id("a"), &id("b")).expect("b should score");
        assert!(approx(scored.score, 100.0), "got {}", scored.score);
        assert!(scored.has_reason(ScoreFactor::CriticalBoost));
    }

    #[test]
    fn boost_flag_without_underlink_adds_nothing() {
        let engine = worked_example(true, 7);

        let scored = engine.score(&id("a"), &id("b")).expect("b should score");
        assert!(approx(scored.score, 70.0), "got {}", scored.score);
        assert!(!scored.has_reason(ScoreFactor::CriticalBoost));
    }

    #[test]
    fn overlinked_target_halves_whole_total() {
        let engine = worked_example(false, 20);

        let scored = engine.score(&id("a"), &id("b")).expect("b should still score");
        assert!(approx(scored.score, 35.0), "got {}", scored.score);
        assert_eq!(scored.reasons.last(), Some(&ScoreFactor::OverlinkPenalty));
    }

    #[test]
    fn count_at_overlinked_threshold_is_not_penalized() {
        let engine = worked_example(false, 15);

        let scored = engine.score(&id("a"), &id("b")).expect("b should score");
        assert!(approx(scored.score, 70.0), "got {}", scored.score);
    }

    #[test]
    fn self_pair_and_unknown_ids_never_score() {
        let engine = worked_example(false, 2);
        assert_eq!(engine.score(&id("a"), &id("a")), None);
        assert_eq!(engine.score(&id("ghost"), &id("b")), None);
        assert_eq!(engine.score(&id("a"), &id("ghost")), None);
    }

    #[test]
    fn relationship_bonus_uses_highest_priority_only() {
        let catalog = Catalog::new(vec![
            Item::new(id("src"), ["x"]),
            Item::new(id("comp"), ["y"]),
            Item::new(id("alt"), ["z"]),
        ])
        .expect("catalog should build");
        let graph = RelationshipGraph::from_entries([(
            id("src"),
            RelationshipEdge {
                complementary: vec![id("comp")],
                alternatives: vec![id("comp"), id("alt")],
                ..RelationshipEdge::default()
            },
        )]);
        let tracker = LinkPopularityTracker::new();
        tracker.set(id("comp"), 8);
        tracker.set(id("alt"), 8);
        let linking = LinkingConfig::default().validate().expect("defaults validate");
        let engine =
            ScoringEngine::new(Arc::new(catalog), Arc::new(graph), Arc::new(tracker), &linking);

        let comp = engine.score(&id("src"), &id("comp")).expect("complementary scores");
        assert!(approx(comp.score, 24.0), "got {}", comp.score);
        assert_eq!(comp.reasons, vec![ScoreFactor::ComplementaryRelation]);

        let alt = engine.score(&id("src"), &id("alt")).expect("alternative scores");
        assert!(approx(alt.score, 18.0), "got {}", alt.score);
        assert_eq!(alt.reasons, vec![ScoreFactor::AlternativeRelation]);
    }

    #[test]
    fn popular_label_adds_popularity_bonus() {
        let catalog = Catalog::new(vec![
            Item::new(id("src"), ["x"]),
            Item::new(id("hit"), ["y"]).with_label(ItemLabel::Popular),
        ])
        .expect("catalog should build");
        let tracker = LinkPopularityTracker::new();
        tracker.set(id("hit"), 8);
        let linking = LinkingConfig::default().validate().expect("defaults validate");
        let engine = ScoringEngine::new(
            Arc::new(catalog),
            Arc::new(RelationshipGraph::default()),
            Arc::new(tracker),
            &linking,
        );

        let scored = engine.score(&id("src"), &id("hit")).expect("popular item scores");
        assert!(approx(scored.score, 10.0), "got {}", scored.score);
        assert_eq!(scored.reasons, vec![ScoreFactor::PopularityBonus]);
    }

    #[test]
    fn score_all_skips_source_and_exclusions() {
        let engine = worked_example(false, 2);

        let all = engine.score_all(&id("a"), &[]);
        assert_eq!(all.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["b"]);

        let excluded = engine.score_all(&id("a"), &[id("b")]);
        assert!(excluded.is_empty());
    }
}

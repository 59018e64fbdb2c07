//! Related-tools selection for a single page

use tracing::{debug, warn};

use super::scoring::ScoringEngine;
use super::types::{ScoredCandidate, TieBreak};
use crate::config::ValidatedLinking;
use crate::domain::item::ItemId;

/// Ranks scoring output into the final related-tools list for a page.
#[derive(Debug, Clone)]
pub struct RecommendationSelector {
    engine: ScoringEngine,
    default_count: usize,
    tie_break: TieBreak,
}

impl RecommendationSelector {
    pub fn new(engine: ScoringEngine, linking: &ValidatedLinking) -> Self {
        Self {
            engine,
            default_count: linking.config().related_tools_per_page,
            tie_break: linking.config().tie_break,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    /// Related tool ids for `source`, best first, at most `count`
    /// (defaults to the configured per-page count).
    pub fn related_tools(
        &self,
        source: &ItemId,
        count: Option<usize>,
        exclude: &[ItemId],
    ) -> Vec<ItemId> {
        self.explain(source, count, exclude).into_iter().map(|candidate| candidate.id).collect()
    }

    /// Same selection as [`related_tools`](Self::related_tools), keeping scores and reasons.
    pub fn explain(
        &self,
        source: &ItemId,
        count: Option<usize>,
        exclude: &[ItemId],
    ) -> Vec<ScoredCandidate> {
        if !self.engine.catalog().contains(source) {
            warn!(
                event_name = "linking.selector.unknown_source",
                source = %source,
                "no catalog item for related-tools query; returning no recommendations"
            );
            return Vec::new();
        }

        let count = count.unwrap_or(self.default_count);
        let mut candidates = self.engine.score_all(source, exclude);

        // Stable sort: equal scores keep catalog order unless ids are the tie break.
        match self.tie_break {
            TieBreak::CatalogOrder => {
                candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
            }
            TieBreak::ItemId => {
                candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
            }
        }
        candidates.truncate(count);

        debug!(
            event_name = "linking.selector.selected",
            source = %source,
            requested = count,
            selected = candidates.len(),
            "related tools selected"
        );

        candidates
    }
}

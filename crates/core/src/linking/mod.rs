//! Related-tool recommendation engine
//!
//! Scores every catalog item against a source page using shared categories,
//! declared relationships, under-link boosts and popularity, then selects the
//! top candidates for the page's "related tools" block.

mod scoring;
mod selector;
mod tracker;
mod types;

pub use scoring::{LinkThresholds, ScoringEngine, ScoringWeights};
pub use selector::RecommendationSelector;
pub use tracker::{seed_count, LinkPopularityTracker};
pub use types::*;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { same_category: 0.40, workflow: 0.30, underlinked: 0.20, popular: 0.10 };

/// Default link-count thresholds
pub const DEFAULT_THRESHOLDS: LinkThresholds =
    LinkThresholds { orphan: 3, underlinked: 5, well_linked: 10, overlinked: 15 };

/// Multiplier applied to the whole score of an over-linked target.
pub const OVERLINK_PENALTY: f64 = 0.5;

/// Relationship bonus multipliers, by relation kind.
pub const WORKFLOW_BONUS: f64 = 100.0;
pub const COMPLEMENTARY_BONUS: f64 = 80.0;
pub const ALTERNATIVE_BONUS: f64 = 60.0;

/// Extra under-link multiplier for boost-flagged targets.
pub const CRITICAL_BOOST: f64 = 50.0;

/// Seeded inbound-link estimate for every item before any audit runs.
pub const BASELINE_LINKS: u32 = 5;
pub const POPULAR_LINK_BONUS: u32 = 3;
pub const BOOSTED_LINK_DISCOUNT: u32 = 3;
pub const MIN_SEEDED_LINKS: u32 = 1;

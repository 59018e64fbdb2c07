//! Types for the recommendation engine

use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;
use crate::domain::relationship::RelationKind;

/// Scoring rule that contributed to a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    /// Source and target share at least one category
    CategoryMatch,
    /// Target is in the source's workflow list
    WorkflowRelation,
    /// Target is in the source's complementary list
    ComplementaryRelation,
    /// Target is in the source's alternatives list
    AlternativeRelation,
    /// Target's link count is below the under-linked threshold
    UnderlinkBoost,
    /// Under-linked target is also boost-flagged
    CriticalBoost,
    /// Target carries the popular label
    PopularityBonus,
    /// Target's link count exceeds the over-linked threshold; score halved
    OverlinkPenalty,
}

impl ScoreFactor {
    pub fn from_relation(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Workflow => Self::WorkflowRelation,
            RelationKind::Complementary => Self::ComplementaryRelation,
            RelationKind::Alternative => Self::AlternativeRelation,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CategoryMatch => "shares a category",
            Self::WorkflowRelation => "next step in the workflow",
            Self::ComplementaryRelation => "complements this tool",
            Self::AlternativeRelation => "alternative to this tool",
            Self::UnderlinkBoost => "under-linked across the site",
            Self::CriticalBoost => "flagged for link boosting",
            Self::PopularityBonus => "popular tool",
            Self::OverlinkPenalty => "already over-linked (score halved)",
        }
    }
}

/// A scored recommendation candidate, discarded after selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: ItemId,
    pub score: f64,
    pub reasons: Vec<ScoreFactor>,
}

impl ScoredCandidate {
    pub fn has_reason(&self, factor: ScoreFactor) -> bool {
        self.reasons.contains(&factor)
    }
}

/// Secondary ordering for equally scored candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep catalog enumeration order (stable sort).
    #[default]
    CatalogOrder,
    /// Lexicographic item id, independent of catalog order.
    ItemId,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogOrder => "catalog_order",
            Self::ItemId => "item_id",
        }
    }
}

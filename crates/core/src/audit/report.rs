use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;
use crate::linking::{LinkPopularityTracker, LinkThresholds};

/// Non-overlapping inbound-link classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkBucket {
    Orphan,
    Underlinked,
    WellLinked,
    Overlinked,
}

impl LinkBucket {
    pub fn classify(count: u32, thresholds: &LinkThresholds) -> Self {
        if count < thresholds.orphan {
            Self::Orphan
        } else if count <= thresholds.underlinked {
            Self::Underlinked
        } else if count <= thresholds.well_linked {
            Self::WellLinked
        } else {
            Self::Overlinked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orphan => "orphan",
            Self::Underlinked => "underlinked",
            Self::WellLinked => "well_linked",
            Self::Overlinked => "overlinked",
        }
    }
}

pub fn is_severely_overlinked(count: u32, thresholds: &LinkThresholds) -> bool {
    count > thresholds.overlinked
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditVerdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemLinkStatus {
    pub id: ItemId,
    pub count: u32,
    pub bucket: LinkBucket,
    pub severely_overlinked: bool,
    /// Inbound edges per link source name.
    pub by_source: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketMembership {
    pub orphan: Vec<ItemId>,
    pub underlinked: Vec<ItemId>,
    pub well_linked: Vec<ItemId>,
    pub overlinked: Vec<ItemId>,
    pub severely_overlinked: Vec<ItemId>,
}

impl BucketMembership {
    pub fn from_statuses(items: &[ItemLinkStatus]) -> Self {
        let mut membership = Self::default();
        for item in items {
            let bucket = match item.bucket {
                LinkBucket::Orphan => &mut membership.orphan,
                LinkBucket::Underlinked => &mut membership.underlinked,
                LinkBucket::WellLinked => &mut membership.well_linked,
                LinkBucket::Overlinked => &mut membership.overlinked,
            };
            bucket.push(item.id.clone());
            if item.severely_overlinked {
                membership.severely_overlinked.push(item.id.clone());
            }
        }
        membership
    }
}

/// Distribution of inbound counts across the catalog (population statistics).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub item_count: usize,
    pub total_links: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
}

impl DistributionStats {
    pub fn from_counts(counts: &[u32]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }

        let item_count = counts.len();
        let total_links: u64 = counts.iter().map(|count| u64::from(*count)).sum();
        let mean = total_links as f64 / item_count as f64;
        let variance = counts
            .iter()
            .map(|count| {
                let delta = f64::from(*count) - mean;
                delta * delta
            })
            .sum::<f64>()
            / item_count as f64;

        Self {
            item_count,
            total_links,
            mean,
            std_dev: variance.sqrt(),
            min: counts.iter().copied().min().unwrap_or(0),
            max: counts.iter().copied().max().unwrap_or(0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub name: String,
    pub edges: usize,
    pub ignored: usize,
}

/// Findings that never fail validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditWarning {
    HighVariance { std_dev: f64, limit: f64 },
    SeverelyOverlinked { item: ItemId, count: u32, limit: u32 },
    AboveMaxLinks { item: ItemId, count: u32, max: u32 },
}

impl std::fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighVariance { std_dev, limit } => write!(
                f,
                "inbound link distribution is uneven (std dev {std_dev:.2} >= {limit:.2})"
            ),
            Self::SeverelyOverlinked { item, count, limit } => {
                write!(f, "{item} is severely over-linked ({count} > {limit})")
            }
            Self::AboveMaxLinks { item, count, max } => {
                write!(f, "{item} exceeds max links per tool ({count} > {max})")
            }
        }
    }
}

/// Pages that would link to an under-linked item if their lists had room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Remediation {
    pub item: ItemId,
    pub count: u32,
    pub bucket: LinkBucket,
    pub suggested_sources: Vec<ItemId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkAuditReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub thresholds: LinkThresholds,
    pub min_links_per_tool: u32,
    pub max_links_per_tool: u32,
    pub items: Vec<ItemLinkStatus>,
    pub buckets: BucketMembership,
    pub stats: DistributionStats,
    pub sources: Vec<SourceSummary>,
    pub ignored_edges: usize,
    pub warnings: Vec<AuditWarning>,
    pub remediation: Vec<Remediation>,
    pub verdict: AuditVerdict,
}

impl LinkAuditReport {
    pub fn passed(&self) -> bool {
        self.verdict == AuditVerdict::Pass
    }

    pub fn orphans(&self) -> &[ItemId] {
        &self.buckets.orphan
    }

    pub fn count_for(&self, id: &ItemId) -> Option<u32> {
        self.items.iter().find(|item| item.id == *id).map(|item| item.count)
    }

    /// Replaces the tracker snapshot with the recomputed inbound counts.
    pub fn apply_to(&self, tracker: &LinkPopularityTracker) {
        tracker.replace_all(self.items.iter().map(|item| (item.id.clone(), item.count)));
    }
}

#[cfg(test)]
mod tests {
    use super::{is_severely_overlinked, DistributionStats, LinkBucket};
    use crate::linking::LinkThresholds;

    const THRESHOLDS: LinkThresholds =
        LinkThresholds { orphan: 3, underlinked: 5, well_linked: 10, overlinked: 15 };

    #[test]
    fn bucket_boundaries() {
        assert_eq!(LinkBucket::classify(0, &THRESHOLDS), LinkBucket::Orphan);
        assert_eq!(LinkBucket::classify(2, &THRESHOLDS), LinkBucket::Orphan);
        assert_eq!(LinkBucket::classify(3, &THRESHOLDS), LinkBucket::Underlinked);
        assert_eq!(LinkBucket::classify(5, &THRESHOLDS), LinkBucket::Underlinked);
        assert_eq!(LinkBucket::classify(6, &THRESHOLDS), LinkBucket::WellLinked);
        assert_eq!(LinkBucket::classify(10, &THRESHOLDS), LinkBucket::WellLinked);
        assert_eq!(LinkBucket::classify(11, &THRESHOLDS), LinkBucket::Overlinked);
        assert_eq!(LinkBucket::classify(20, &THRESHOLDS), LinkBucket::Overlinked);
    }

    #[test]
    fn severe_overlink_is_strictly_above_overlinked_threshold() {
        assert!(!is_severely_overlinked(15, &THRESHOLDS));
        assert!(is_severely_overlinked(16, &THRESHOLDS));
    }

    #[test]
    fn population_statistics() {
        let stats = DistributionStats::from_counts(&[0, 2, 6, 6, 20]);
        assert_eq!(stats.item_count, 5);
        assert_eq!(stats.total_links, 34);
        assert!((stats.mean - 6.8).abs() < 1e-9);
        // population variance = 244.8 / 5 = 48.96
        assert!((stats.std_dev - 48.96f64.sqrt()).abs() < 1e-9);
        assert_eq!((stats.min, stats.max), (0, 20));
    }

    #[test]
    fn empty_catalog_statistics_are_zero() {
        assert_eq!(DistributionStats::from_counts(&[]), DistributionStats::default());
    }
}

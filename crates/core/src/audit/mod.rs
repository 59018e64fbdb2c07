//! Catalog-wide inbound-link audit.
//!
//! The auditor aggregates every registered [`LinkSource`] into per-item
//! inbound counts, classifies each item against the configured thresholds and
//! renders a pass/fail verdict (fail iff any item is an orphan). Uneven
//! distributions and over-linked items only produce warnings.

pub mod report;
pub mod sources;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ValidatedLinking;
use crate::domain::item::ItemId;
use crate::linking::{LinkThresholds, RecommendationSelector, ScoreFactor, ScoringEngine};

pub use report::{
    is_severely_overlinked, AuditVerdict, AuditWarning, BucketMembership, DistributionStats,
    ItemLinkStatus, LinkAuditReport, LinkBucket, Remediation, SourceSummary,
};
pub use sources::{
    EditorialLinkSource, FeaturedLinkSource, LinkEdge, LinkSource, RecommendationLinkSource,
    HOME_PAGE,
};

/// Suggested linking pages listed per orphan or underlinked item.
pub const REMEDIATION_SUGGESTIONS: usize = 3;

/// A catalog page that would rank `target` highly in its related-tools block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSuggestion {
    pub source: ItemId,
    pub score: f64,
    pub reasons: Vec<ScoreFactor>,
}

pub struct LinkAuditor {
    engine: ScoringEngine,
    thresholds: LinkThresholds,
    min_links_per_tool: u32,
    max_links_per_tool: u32,
    variance_warning: f64,
    sources: Vec<Box<dyn LinkSource>>,
}

impl LinkAuditor {
    /// An auditor with no link sources registered.
    pub fn new(engine: ScoringEngine, linking: &ValidatedLinking) -> Self {
        let config = linking.config();
        Self {
            engine,
            thresholds: *linking.thresholds(),
            min_links_per_tool: config.min_links_per_tool,
            max_links_per_tool: config.max_links_per_tool,
            variance_warning: config.variance_warning,
            sources: Vec::new(),
        }
    }

    /// Recommendations, editorial cross-references and the home-page featured block.
    pub fn standard(
        selector: RecommendationSelector,
        linking: &ValidatedLinking,
        editorial: Vec<LinkEdge>,
    ) -> Self {
        let featured = FeaturedLinkSource::from_catalog(selector.engine().catalog());
        Self::new(selector.engine().clone(), linking)
            .with_source(RecommendationLinkSource::new(selector))
            .with_source(EditorialLinkSource::new(editorial))
            .with_source(featured)
    }

    pub fn with_source(mut self, source: impl LinkSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    pub fn run(&self) -> LinkAuditReport {
        let catalog = self.engine.catalog();
        let mut tallies: HashMap<&ItemId, BTreeMap<String, u32>> = HashMap::new();
        let mut linking_pages: HashMap<ItemId, HashSet<String>> = HashMap::new();
        let mut summaries = Vec::with_capacity(self.sources.len());
        let mut ignored_edges = 0usize;

        for source in &self.sources {
            let edges = source.edges();
            let mut ignored = 0usize;
            for edge in &edges {
                let Some(target) = catalog.get(&edge.to) else {
                    ignored += 1;
                    continue;
                };
                if edge.is_self_link() {
                    ignored += 1;
                    continue;
                }
                *tallies
                    .entry(&target.id)
                    .or_default()
                    .entry(source.name().to_owned())
                    .or_insert(0) += 1;
                linking_pages.entry(target.id.clone()).or_default().insert(edge.from.clone());
            }

            if ignored > 0 {
                warn!(
                    event_name = "audit.source.edges_ignored",
                    source = source.name(),
                    ignored,
                    "link edges to unknown targets or self-links were ignored"
                );
            }
            ignored_edges += ignored;
            summaries.push(SourceSummary {
                name: source.name().to_owned(),
                edges: edges.len() - ignored,
                ignored,
            });
        }

        let items: Vec<ItemLinkStatus> = catalog
            .iter()
            .map(|item| {
                let by_source = tallies.remove(&item.id).unwrap_or_default();
                let count = by_source.values().sum();
                ItemLinkStatus {
                    id: item.id.clone(),
                    count,
                    bucket: LinkBucket::classify(count, &self.thresholds),
                    severely_overlinked: is_severely_overlinked(count, &self.thresholds),
                    by_source,
                }
            })
            .collect();

        let counts: Vec<u32> = items.iter().map(|item| item.count).collect();
        let stats = DistributionStats::from_counts(&counts);
        let buckets = BucketMembership::from_statuses(&items);
        let warnings = self.collect_warnings(&items, &stats);
        let remediation = self.remediation(&items, &linking_pages);
        let passed = buckets.orphan.is_empty();
        let verdict = if passed { AuditVerdict::Pass } else { AuditVerdict::Fail };

        for warning in &warnings {
            warn!(event_name = "audit.run.warning", warning = %warning, "link audit warning");
        }
        info!(
            event_name = "audit.run.completed",
            items = items.len(),
            orphans = buckets.orphan.len(),
            underlinked = buckets.underlinked.len(),
            overlinked = buckets.overlinked.len(),
            mean = stats.mean,
            std_dev = stats.std_dev,
            ignored_edges,
            passed,
            "link audit completed"
        );

        LinkAuditReport {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            thresholds: self.thresholds,
            min_links_per_tool: self.min_links_per_tool,
            max_links_per_tool: self.max_links_per_tool,
            items,
            buckets,
            stats,
            sources: summaries,
            ignored_edges,
            warnings,
            remediation,
            verdict,
        }
    }

    /// Catalog pages that score `target` highest, best first, at most `limit`.
    pub fn suggest_sources(&self, target: &ItemId, limit: usize) -> Vec<SourceSuggestion> {
        let mut suggestions = self.ranked_sources(target);
        suggestions.truncate(limit);
        suggestions
    }

    fn ranked_sources(&self, target: &ItemId) -> Vec<SourceSuggestion> {
        let mut suggestions: Vec<SourceSuggestion> = self
            .engine
            .catalog()
            .iter()
            .filter_map(|page| {
                self.engine.score(&page.id, target).map(|candidate| SourceSuggestion {
                    source: page.id.clone(),
                    score: candidate.score,
                    reasons: candidate.reasons,
                })
            })
            .collect();
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions
    }

    fn collect_warnings(
        &self,
        items: &[ItemLinkStatus],
        stats: &DistributionStats,
    ) -> Vec<AuditWarning> {
        let mut warnings = Vec::new();
        if stats.item_count > 0 && stats.std_dev >= self.variance_warning {
            warnings.push(AuditWarning::HighVariance {
                std_dev: stats.std_dev,
                limit: self.variance_warning,
            });
        }
        for item in items {
            if item.severely_overlinked {
                warnings.push(AuditWarning::SeverelyOverlinked {
                    item: item.id.clone(),
                    count: item.count,
                    limit: self.thresholds.overlinked,
                });
            }
            if item.count > self.max_links_per_tool {
                warnings.push(AuditWarning::AboveMaxLinks {
                    item: item.id.clone(),
                    count: item.count,
                    max: self.max_links_per_tool,
                });
            }
        }
        warnings
    }

    fn remediation(
        &self,
        items: &[ItemLinkStatus],
        linking_pages: &HashMap<ItemId, HashSet<String>>,
    ) -> Vec<Remediation> {
        items
            .iter()
            .filter(|item| matches!(item.bucket, LinkBucket::Orphan | LinkBucket::Underlinked))
            .map(|item| {
                let already_linking = linking_pages.get(&item.id);
                let suggested_sources = self
                    .ranked_sources(&item.id)
                    .into_iter()
                    .map(|suggestion| suggestion.source)
                    .filter(|page| {
                        already_linking.map_or(true, |pages| !pages.contains(page.as_str()))
                    })
                    .take(REMEDIATION_SUGGESTIONS)
                    .collect();
                Remediation {
                    item: item.id.clone(),
                    count: item.count,
                    bucket: item.bucket,
                    suggested_sources,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        AuditVerdict, AuditWarning, LinkAuditor, LinkBucket, LinkEdge, LinkSource,
        REMEDIATION_SUGGESTIONS,
    };
    use crate::config::{LinkingConfig, ValidatedLinking};
    use crate::domain::item::{Catalog, Item, ItemId, ItemLabel};
    use crate::domain::relationship::{RelationshipEdge, RelationshipGraph};
    use crate::fixtures;
    use crate::linking::{LinkPopularityTracker, RecommendationSelector, ScoringEngine};

    struct StaticSource {
        name: &'static str,
        edges: Vec<LinkEdge>,
    }

    impl LinkSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn edges(&self) -> Vec<LinkEdge> {
            self.edges.clone()
        }
    }

    fn id(raw: &str) -> ItemId {
        ItemId::parse(raw).expect("test id should be valid")
    }

    fn linking() -> ValidatedLinking {
        LinkingConfig::default().validate().expect("default linking config validates")
    }

    fn engine(catalog: Catalog, graph: RelationshipGraph) -> ScoringEngine {
        let tracker = LinkPopularityTracker::seeded(&catalog, &graph);
        ScoringEngine::new(Arc::new(catalog), Arc::new(graph), Arc::new(tracker), &linking())
    }

    fn five_items() -> Catalog {
        Catalog::new(
            ["e1", "e2", "e3", "e4", "e5"]
                .into_iter()
                .map(|raw| Item::new(id(raw), ["pdf"]))
                .collect(),
        )
        .expect("catalog should build")
    }

    /// `count` distinct pages linking to `target`.
    fn inbound(target: &str, count: usize) -> Vec<LinkEdge> {
        (0..count).map(|n| LinkEdge::new(format!("page-{n}"), id(target))).collect()
    }

    #[test]
    fn classification_example_fails_on_orphans() {
        let edges = [("e1", 0), ("e2", 2), ("e3", 6), ("e4", 6), ("e5", 20)]
            .into_iter()
            .flat_map(|(target, count)| inbound(target, count))
            .collect();
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "static", edges });

        let report = auditor.run();

        let buckets: Vec<LinkBucket> = report.items.iter().map(|item| item.bucket).collect();
        assert_eq!(
            buckets,
            vec![
                LinkBucket::Orphan,
                LinkBucket::Orphan,
                LinkBucket::WellLinked,
                LinkBucket::WellLinked,
                LinkBucket::Overlinked,
            ]
        );
        assert_eq!(report.orphans(), &[id("e1"), id("e2")]);
        assert_eq!(report.buckets.severely_overlinked, vec![id("e5")]);
        assert_eq!(report.verdict, AuditVerdict::Fail);
        assert!(!report.passed());

        assert!(report.warnings.iter().any(|w| matches!(w, AuditWarning::HighVariance { .. })));
        assert!(report.warnings.contains(&AuditWarning::SeverelyOverlinked {
            item: id("e5"),
            count: 20,
            limit: 15,
        }));
        assert!(report.warnings.contains(&AuditWarning::AboveMaxLinks {
            item: id("e5"),
            count: 20,
            max: 15,
        }));
    }

    #[test]
    fn unknown_targets_and_self_links_are_ignored() {
        let edges = vec![
            LinkEdge::new("guides/a", id("e1")),
            LinkEdge::new("guides/a", id("ghost")),
            LinkEdge::new("e2", id("e2")),
        ];
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "static", edges });

        let report = auditor.run();

        assert_eq!(report.ignored_edges, 2);
        assert_eq!(report.count_for(&id("e1")), Some(1));
        assert_eq!(report.count_for(&id("e2")), Some(0));
        assert_eq!(report.sources[0].edges, 1);
        assert_eq!(report.sources[0].ignored, 2);
    }

    #[test]
    fn counts_are_broken_down_per_source() {
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "alpha", edges: inbound("e3", 2) })
            .with_source(StaticSource { name: "beta", edges: inbound("e3", 3) });

        let report = auditor.run();
        let e3 = &report.items[2];

        assert_eq!(e3.count, 5);
        assert_eq!(e3.by_source.get("alpha"), Some(&2));
        assert_eq!(e3.by_source.get("beta"), Some(&3));
        assert_eq!(auditor.source_names(), vec!["alpha", "beta"]);
    }

    #[test]
    fn even_distribution_passes_without_warnings() {
        let edges = ["e1", "e2", "e3", "e4", "e5"]
            .into_iter()
            .flat_map(|target| inbound(target, 7))
            .collect();
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "static", edges });

        let report = auditor.run();

        assert_eq!(report.verdict, AuditVerdict::Pass);
        assert!(report.warnings.is_empty());
        assert!(report.remediation.is_empty());
        assert_eq!(report.stats.std_dev, 0.0);
        assert!(!report.run_id.is_empty());
    }

    #[test]
    fn variance_warning_fires_at_exactly_the_limit() {
        let audit_pair = |first: usize, second: usize| {
            let catalog =
                Catalog::new(vec![Item::new(id("p1"), ["pdf"]), Item::new(id("p2"), ["pdf"])])
                    .expect("catalog should build");
            let mut edges = inbound("p1", first);
            edges.extend(inbound("p2", second));
            LinkAuditor::new(engine(catalog, RelationshipGraph::default()), &linking())
                .with_source(StaticSource { name: "static", edges })
                .run()
        };

        // counts 0 and 6: mean 3, population std dev exactly 3.0
        let at_limit = audit_pair(0, 6);
        assert_eq!(at_limit.stats.std_dev, 3.0);
        assert!(at_limit
            .warnings
            .contains(&AuditWarning::HighVariance { std_dev: 3.0, limit: 3.0 }));

        // counts 1 and 5: std dev 2.0
        let below_limit = audit_pair(1, 5);
        assert_eq!(below_limit.stats.std_dev, 2.0);
        assert!(!below_limit
            .warnings
            .iter()
            .any(|warning| matches!(warning, AuditWarning::HighVariance { .. })));
    }

    #[test]
    fn empty_catalog_has_zero_statistics_and_passes() {
        let catalog = Catalog::new(Vec::new()).expect("empty catalog is valid");
        let report = LinkAuditor::new(engine(catalog, RelationshipGraph::default()), &linking()).run();

        assert_eq!(report.stats.mean, 0.0);
        assert_eq!(report.stats.std_dev, 0.0);
        assert!(report.passed());
    }

    #[test]
    fn report_counts_replace_tracker_snapshot() {
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "static", edges: inbound("e4", 9) });
        let tracker = LinkPopularityTracker::new();
        tracker.set(id("e4"), 1);

        auditor.run().apply_to(&tracker);

        assert_eq!(tracker.get(&id("e4")), 9);
        assert_eq!(tracker.get(&id("e1")), 0);
        assert_eq!(tracker.len(), 5);
    }

    #[test]
    fn suggest_sources_ranks_pages_by_score_for_target() {
        let catalog = Catalog::new(vec![
            Item::new(id("merge-pdf"), ["pdf"]),
            Item::new(id("split-pdf"), ["pdf"]),
            Item::new(id("crop-image"), ["image"]),
            Item::new(id("watermark-pdf"), ["pdf"]).with_label(ItemLabel::Featured),
        ])
        .expect("catalog should build");
        let graph = RelationshipGraph::from_entries([(
            id("crop-image"),
            RelationshipEdge { workflow: vec![id("watermark-pdf")], ..RelationshipEdge::default() },
        )]);
        let auditor = LinkAuditor::new(engine(catalog, graph), &linking());

        let suggestions = auditor.suggest_sources(&id("watermark-pdf"), 2);

        // crop-image: workflow 30; merge-pdf and split-pdf: category 40 each.
        let pages: Vec<&str> = suggestions.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(pages, vec!["merge-pdf", "split-pdf"]);
        assert!(suggestions.iter().all(|s| s.source != id("watermark-pdf")));
    }

    #[test]
    fn remediation_skips_pages_already_linking() {
        let edges = vec![LinkEdge::new("e2", id("e1"))];
        let auditor = LinkAuditor::new(engine(five_items(), RelationshipGraph::default()), &linking())
            .with_source(StaticSource { name: "static", edges });

        let report = auditor.run();
        let e1 = report
            .remediation
            .iter()
            .find(|entry| entry.item == id("e1"))
            .expect("e1 is an orphan");

        assert_eq!(e1.count, 1);
        assert_eq!(e1.suggested_sources.len(), REMEDIATION_SUGGESTIONS);
        assert!(!e1.suggested_sources.contains(&id("e2")));
        assert!(!e1.suggested_sources.contains(&id("e1")));
    }

    #[test]
    fn standard_auditor_over_demo_inputs() {
        let catalog = Arc::new(fixtures::demo_catalog().expect("demo catalog"));
        let graph = Arc::new(fixtures::demo_relationships().expect("demo relationships"));
        let tracker = Arc::new(LinkPopularityTracker::seeded(&catalog, &graph));
        let linking = linking();
        let engine = ScoringEngine::new(catalog.clone(), graph, tracker, &linking);
        let selector = RecommendationSelector::new(engine, &linking);
        let editorial = fixtures::demo_editorial().expect("demo editorial");

        let auditor = LinkAuditor::standard(selector, &linking, editorial);
        let report = auditor.run();

        assert_eq!(auditor.source_names(), vec!["recommendations", "editorial", "featured"]);
        assert_eq!(report.items.len(), catalog.len());
        let recommended: usize = report
            .sources
            .iter()
            .find(|source| source.name == "recommendations")
            .map(|source| source.edges)
            .expect("recommendation source summary");
        assert_eq!(recommended, catalog.len() * 4);
        assert_eq!(report.ignored_edges, 0);
    }
}

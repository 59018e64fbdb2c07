use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::item::{Catalog, ItemId};

/// Declared relations for one source item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipEdge {
    pub workflow: Vec<ItemId>,
    pub complementary: Vec<ItemId>,
    pub alternatives: Vec<ItemId>,
    pub needs_boost: bool,
}

/// Returned for items that declare no relations.
pub static NO_RELATIONS: RelationshipEdge = RelationshipEdge {
    workflow: Vec::new(),
    complementary: Vec::new(),
    alternatives: Vec::new(),
    needs_boost: false,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Workflow,
    Complementary,
    Alternative,
}

impl RelationshipEdge {
    /// Highest-priority relation to `target`: workflow, then complementary, then alternative.
    pub fn relation_to(&self, target: &ItemId) -> Option<RelationKind> {
        if self.workflow.contains(target) {
            Some(RelationKind::Workflow)
        } else if self.complementary.contains(target) {
            Some(RelationKind::Complementary)
        } else if self.alternatives.contains(target) {
            Some(RelationKind::Alternative)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workflow.is_empty()
            && self.complementary.is_empty()
            && self.alternatives.is_empty()
            && !self.needs_boost
    }

    fn targets_mut(&mut self) -> [(RelationKind, &mut Vec<ItemId>); 3] {
        [
            (RelationKind::Workflow, &mut self.workflow),
            (RelationKind::Complementary, &mut self.complementary),
            (RelationKind::Alternative, &mut self.alternatives),
        ]
    }
}

#[derive(Clone, Debug, Default)]
pub struct RelationshipGraph {
    edges: HashMap<ItemId, RelationshipEdge>,
}

impl RelationshipGraph {
    pub fn new(edges: HashMap<ItemId, RelationshipEdge>) -> Self {
        Self { edges }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (ItemId, RelationshipEdge)>) -> Self {
        Self { edges: entries.into_iter().collect() }
    }

    pub fn related(&self, item: &ItemId) -> &RelationshipEdge {
        self.edges.get(item).unwrap_or(&NO_RELATIONS)
    }

    pub fn needs_boost(&self, item: &ItemId) -> bool {
        self.related(item).needs_boost
    }

    pub fn relation_to(&self, source: &ItemId, target: &ItemId) -> Option<RelationKind> {
        self.related(source).relation_to(target)
    }

    /// Boost-flagged items, sorted by id.
    pub fn boosted_items(&self) -> Vec<&ItemId> {
        let mut boosted: Vec<&ItemId> =
            self.edges.iter().filter(|(_, edge)| edge.needs_boost).map(|(id, _)| id).collect();
        boosted.sort();
        boosted
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Drops relation targets and source entries that are not catalog items.
    /// Returns the number of dropped references.
    pub fn prune_unknown(&mut self, catalog: &Catalog) -> usize {
        let mut dropped = 0;

        let unknown_sources: Vec<ItemId> =
            self.edges.keys().filter(|id| !catalog.contains(id)).cloned().collect();
        for source in unknown_sources {
            warn!(
                event_name = "catalog.relationships.unknown_source",
                source = %source,
                "dropping relationship entry for item missing from catalog"
            );
            self.edges.remove(&source);
            dropped += 1;
        }

        for (source, edge) in &mut self.edges {
            for (kind, targets) in edge.targets_mut() {
                targets.retain(|target| {
                    let known = catalog.contains(target) && target != source;
                    if !known {
                        warn!(
                            event_name = "catalog.relationships.unknown_target",
                            source = %source,
                            target = %target,
                            relation = ?kind,
                            "dropping relation to unknown or self target"
                        );
                        dropped += 1;
                    }
                    known
                });
            }
        }

        dropped
    }
}

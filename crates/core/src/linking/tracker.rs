use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::domain::item::{Catalog, Item, ItemId};
use crate::domain::relationship::RelationshipGraph;

use super::{BASELINE_LINKS, BOOSTED_LINK_DISCOUNT, MIN_SEEDED_LINKS, POPULAR_LINK_BONUS};

/// Per-item inbound link counts consulted by scoring.
///
/// Recommendation queries only read from the tracker. Counts change through
/// [`set`](Self::set) or [`replace_all`](Self::replace_all), typically after an
/// audit recomputes real inbound counts.
#[derive(Debug, Default)]
pub struct LinkPopularityTracker {
    counts: Mutex<HashMap<ItemId, u32>>,
}

impl LinkPopularityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every catalog item with a heuristic estimate.
    pub fn seeded(catalog: &Catalog, graph: &RelationshipGraph) -> Self {
        let counts =
            catalog.iter().map(|item| (item.id.clone(), seed_count(item, graph))).collect();
        Self { counts: Mutex::new(counts) }
    }

    /// Count for `id`, or 0 if it was never seeded.
    pub fn get(&self, id: &ItemId) -> u32 {
        self.counts().get(id).copied().unwrap_or(0)
    }

    pub fn set(&self, id: ItemId, count: u32) {
        self.counts().insert(id, count);
    }

    /// Replaces the whole snapshot.
    pub fn replace_all(&self, counts: impl IntoIterator<Item = (ItemId, u32)>) {
        let fresh: HashMap<ItemId, u32> = counts.into_iter().collect();
        *self.counts() = fresh;
    }

    pub fn snapshot(&self) -> BTreeMap<ItemId, u32> {
        self.counts().iter().map(|(id, count)| (id.clone(), *count)).collect()
    }

    pub fn len(&self) -> usize {
        self.counts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts().is_empty()
    }

    fn counts(&self) -> MutexGuard<'_, HashMap<ItemId, u32>> {
        match self.counts.lock() {
            Ok(counts) => counts,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Baseline, plus a bonus for popular items; boost-flagged items start low (floored).
pub fn seed_count(item: &Item, graph: &RelationshipGraph) -> u32 {
    let mut count = BASELINE_LINKS;
    if item.is_popular() {
        count += POPULAR_LINK_BONUS;
    }
    if graph.needs_boost(&item.id) {
        count = count.saturating_sub(BOOSTED_LINK_DISCOUNT).max(MIN_SEEDED_LINKS);
    }
    count
}

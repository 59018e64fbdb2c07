//! Link-source providers feeding the inbound-link audit.

use serde::{Deserialize, Serialize};

use crate::domain::item::{Catalog, ItemId, ItemLabel};
use crate::linking::RecommendationSelector;

/// Page that carries the featured-tools block.
pub const HOME_PAGE: &str = "home";

/// A realized link from a page (tool id, guide slug, `home`) to a catalog item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkEdge {
    pub from: String,
    pub to: ItemId,
}

impl LinkEdge {
    pub fn new(from: impl Into<String>, to: ItemId) -> Self {
        Self { from: from.into(), to }
    }

    pub fn is_self_link(&self) -> bool {
        self.from == self.to.as_str()
    }
}

pub trait LinkSource: Send + Sync {
    fn name(&self) -> &str;

    fn edges(&self) -> Vec<LinkEdge>;
}

/// Every tool page's related-tools block, as the selector would render it.
#[derive(Debug, Clone)]
pub struct RecommendationLinkSource {
    selector: RecommendationSelector,
}

impl RecommendationLinkSource {
    pub fn new(selector: RecommendationSelector) -> Self {
        Self { selector }
    }
}

impl LinkSource for RecommendationLinkSource {
    fn name(&self) -> &str {
        "recommendations"
    }

    fn edges(&self) -> Vec<LinkEdge> {
        self.selector
            .engine()
            .catalog()
            .iter()
            .flat_map(|item| {
                self.selector
                    .related_tools(&item.id, None, &[])
                    .into_iter()
                    .map(|target| LinkEdge::new(item.id.as_str(), target))
            })
            .collect()
    }
}

/// Hand-placed links from guides and blog posts.
#[derive(Debug, Clone, Default)]
pub struct EditorialLinkSource {
    edges: Vec<LinkEdge>,
}

impl EditorialLinkSource {
    pub fn new(edges: Vec<LinkEdge>) -> Self {
        Self { edges }
    }
}

impl LinkSource for EditorialLinkSource {
    fn name(&self) -> &str {
        "editorial"
    }

    fn edges(&self) -> Vec<LinkEdge> {
        self.edges.clone()
    }
}

/// The home page links to every popular or featured tool.
#[derive(Debug, Clone)]
pub struct FeaturedLinkSource {
    targets: Vec<ItemId>,
}

impl FeaturedLinkSource {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let targets = catalog
            .iter()
            .filter(|item| matches!(item.label, Some(ItemLabel::Popular | ItemLabel::Featured)))
            .map(|item| item.id.clone())
            .collect();
        Self { targets }
    }
}

impl LinkSource for FeaturedLinkSource {
    fn name(&self) -> &str {
        "featured"
    }

    fn edges(&self) -> Vec<LinkEdge> {
        self.targets.iter().map(|target| LinkEdge::new(HOME_PAGE, target.clone())).collect()
    }
}

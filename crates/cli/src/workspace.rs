use std::sync::Arc;

use anyhow::{Context, Result};
use linkwise_core::config::{AppConfig, LoadOptions, ValidatedLinking};
use linkwise_core::errors::ApplicationError;
use linkwise_core::linking::{LinkPopularityTracker, RecommendationSelector, ScoringEngine};
use linkwise_core::loader::{InputOrigin, LinkInputs};
use linkwise_core::{Catalog, LinkAuditor, LinkEdge};
use tracing::info;

/// Loaded config, inputs and engines shared by every command.
pub struct Workspace {
    pub config: AppConfig,
    pub linking: ValidatedLinking,
    pub origin: InputOrigin,
    pub catalog: Arc<Catalog>,
    pub tracker: Arc<LinkPopularityTracker>,
    pub selector: RecommendationSelector,
    editorial: Vec<LinkEdge>,
}

impl Workspace {
    pub fn bootstrap(options: LoadOptions) -> Result<Self> {
        let config = AppConfig::load(options)
            .map_err(ApplicationError::from)
            .context("failed to load linkwise configuration")?;
        let linking = config
            .linking
            .validate()
            .map_err(ApplicationError::from)
            .context("linking configuration was rejected")?;
        let inputs = LinkInputs::load(&config.catalog)
            .map_err(ApplicationError::from)
            .context("failed to load catalog inputs")?;

        let catalog = Arc::new(inputs.catalog);
        let graph = Arc::new(inputs.graph);
        let tracker = Arc::new(LinkPopularityTracker::seeded(&catalog, &graph));
        let engine = ScoringEngine::new(catalog.clone(), graph, tracker.clone(), &linking);
        let selector = RecommendationSelector::new(engine, &linking);

        info!(
            event_name = "system.bootstrap.ready",
            origin = inputs.origin.as_str(),
            items = catalog.len(),
            related_tools_per_page = selector.default_count(),
            "linkwise workspace ready"
        );

        Ok(Self {
            config,
            linking,
            origin: inputs.origin,
            catalog,
            tracker,
            selector,
            editorial: inputs.editorial,
        })
    }

    pub fn auditor(&self) -> LinkAuditor {
        LinkAuditor::standard(self.selector.clone(), &self.linking, self.editorial.clone())
    }
}

/// Machine-readable class for a bootstrap failure.
pub fn error_class(error: &anyhow::Error) -> &'static str {
    error.downcast_ref::<ApplicationError>().map_or("runtime", ApplicationError::error_class)
}

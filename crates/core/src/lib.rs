pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod linking;
pub mod loader;

pub use audit::{
    AuditVerdict, AuditWarning, LinkAuditReport, LinkAuditor, LinkBucket, LinkEdge, LinkSource,
    SourceSuggestion,
};
pub use config::{AppConfig, ConfigError, LinkingConfig, LoadOptions, ValidatedLinking};
pub use domain::item::{Catalog, Item, ItemId, ItemLabel};
pub use domain::relationship::{RelationKind, RelationshipEdge, RelationshipGraph, NO_RELATIONS};
pub use errors::{ApplicationError, CatalogError, DomainError};
pub use linking::{
    LinkPopularityTracker, LinkThresholds, RecommendationSelector, ScoreFactor, ScoredCandidate,
    ScoringEngine, ScoringWeights, TieBreak,
};
pub use loader::{InputOrigin, LinkInputs};

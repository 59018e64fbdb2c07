use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid item id `{0}` (ids must be non-empty and contain no whitespace)")]
    InvalidItemId(String),
    #[error("duplicate catalog item `{0}`")]
    DuplicateItem(String),
    #[error("catalog item `{0}` declares no categories")]
    MissingCategories(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog input `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog input `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable machine-readable class used by CLI error payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Catalog(CatalogError::Domain(_)) => "catalog_invalid",
            Self::Catalog(_) => "catalog_input",
            Self::Configuration(ConfigError::Validation(_)) => "config_validation",
            Self::Configuration(_) => "config_input",
        }
    }
}

//! Reads catalog, relationship and editorial inputs from JSON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::audit::LinkEdge;
use crate::config::CatalogConfig;
use crate::domain::item::{Catalog, Item, ItemId};
use crate::domain::relationship::{RelationshipEdge, RelationshipGraph};
use crate::errors::CatalogError;
use crate::fixtures;

/// Where the loaded inputs came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOrigin {
    BuiltInDemo,
    Files,
}

impl InputOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuiltInDemo => "built_in_demo",
            Self::Files => "files",
        }
    }
}

/// Everything the engine and auditor read, loaded once at startup.
#[derive(Clone, Debug)]
pub struct LinkInputs {
    pub catalog: Catalog,
    pub graph: RelationshipGraph,
    pub editorial: Vec<LinkEdge>,
    pub origin: InputOrigin,
}

impl LinkInputs {
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let (catalog, mut graph, origin) =
            match (&config.items_path, &config.relationships_path) {
                (Some(items_path), Some(relationships_path)) => (
                    load_catalog(items_path)?,
                    load_relationships(relationships_path)?,
                    InputOrigin::Files,
                ),
                _ => (
                    fixtures::demo_catalog()?,
                    fixtures::demo_relationships()?,
                    InputOrigin::BuiltInDemo,
                ),
            };

        let editorial = match (&config.editorial_path, origin) {
            (Some(path), _) => load_editorial(path)?,
            (None, InputOrigin::BuiltInDemo) => fixtures::demo_editorial()?,
            (None, InputOrigin::Files) => Vec::new(),
        };

        let pruned = graph.prune_unknown(&catalog);
        info!(
            event_name = "catalog.inputs.loaded",
            origin = origin.as_str(),
            items = catalog.len(),
            relationship_entries = graph.len(),
            pruned_relations = pruned,
            editorial_edges = editorial.len(),
            "link inputs loaded"
        );

        Ok(Self { catalog, graph, editorial, origin })
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let items: Vec<Item> = read_json(path)?;
    Ok(Catalog::new(items)?)
}

pub fn load_relationships(path: &Path) -> Result<RelationshipGraph, CatalogError> {
    let edges: HashMap<ItemId, RelationshipEdge> = read_json(path)?;
    Ok(RelationshipGraph::new(edges))
}

pub fn load_editorial(path: &Path) -> Result<Vec<LinkEdge>, CatalogError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })
}

//! Built-in demo catalog used when no catalog input is configured.

use std::collections::HashMap;

use crate::audit::LinkEdge;
use crate::domain::item::{Catalog, Item, ItemId, ItemLabel};
use crate::domain::relationship::{RelationshipEdge, RelationshipGraph};
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy)]
struct ToolSeed {
    id: &'static str,
    categories: &'static [&'static str],
    label: Option<ItemLabel>,
}

const TOOL_SEEDS: &[ToolSeed] = &[
    ToolSeed { id: "pdf-to-word", categories: &["pdf", "convert"], label: Some(ItemLabel::Popular) },
    ToolSeed { id: "word-to-pdf", categories: &["pdf", "convert"], label: Some(ItemLabel::Popular) },
    ToolSeed { id: "merge-pdf", categories: &["pdf", "organize"], label: Some(ItemLabel::Popular) },
    ToolSeed { id: "split-pdf", categories: &["pdf", "organize"], label: None },
    ToolSeed { id: "compress-pdf", categories: &["pdf", "optimize"], label: Some(ItemLabel::Popular) },
    ToolSeed { id: "rotate-pdf", categories: &["pdf", "organize"], label: None },
    ToolSeed { id: "pdf-to-jpg", categories: &["pdf", "image", "convert"], label: None },
    ToolSeed { id: "jpg-to-pdf", categories: &["pdf", "image", "convert"], label: None },
    ToolSeed {
        id: "image-compressor",
        categories: &["image", "optimize"],
        label: Some(ItemLabel::Popular),
    },
    ToolSeed { id: "image-resizer", categories: &["image", "edit"], label: None },
    ToolSeed { id: "crop-image", categories: &["image", "edit"], label: None },
    ToolSeed { id: "heic-to-jpg", categories: &["image", "convert"], label: Some(ItemLabel::New) },
    ToolSeed { id: "unlock-pdf", categories: &["pdf", "security"], label: None },
    ToolSeed { id: "protect-pdf", categories: &["pdf", "security"], label: None },
    ToolSeed { id: "watermark-pdf", categories: &["pdf", "edit"], label: Some(ItemLabel::Featured) },
];

#[derive(Debug, Clone, Copy)]
struct RelationSeed {
    source: &'static str,
    workflow: &'static [&'static str],
    complementary: &'static [&'static str],
    alternatives: &'static [&'static str],
    needs_boost: bool,
}

const RELATION_SEEDS: &[RelationSeed] = &[
    RelationSeed {
        source: "pdf-to-word",
        workflow: &["compress-pdf"],
        complementary: &["word-to-pdf"],
        alternatives: &["pdf-to-jpg"],
        needs_boost: false,
    },
    RelationSeed {
        source: "word-to-pdf",
        workflow: &["merge-pdf", "protect-pdf"],
        complementary: &["pdf-to-word"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "merge-pdf",
        workflow: &["compress-pdf", "watermark-pdf"],
        complementary: &["split-pdf"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "split-pdf",
        workflow: &["rotate-pdf"],
        complementary: &["merge-pdf"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "compress-pdf",
        workflow: &["protect-pdf"],
        complementary: &["image-compressor"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "rotate-pdf",
        workflow: &["merge-pdf"],
        complementary: &["split-pdf"],
        alternatives: &[],
        needs_boost: true,
    },
    RelationSeed {
        source: "jpg-to-pdf",
        workflow: &["merge-pdf", "compress-pdf"],
        complementary: &["pdf-to-jpg"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "image-compressor",
        workflow: &["image-resizer"],
        complementary: &["compress-pdf"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "image-resizer",
        workflow: &["crop-image", "image-compressor"],
        complementary: &[],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "heic-to-jpg",
        workflow: &["image-resizer", "jpg-to-pdf"],
        complementary: &[],
        alternatives: &[],
        needs_boost: true,
    },
    RelationSeed {
        source: "unlock-pdf",
        workflow: &["pdf-to-word"],
        complementary: &["protect-pdf"],
        alternatives: &[],
        needs_boost: true,
    },
    RelationSeed {
        source: "protect-pdf",
        workflow: &["watermark-pdf"],
        complementary: &["unlock-pdf"],
        alternatives: &[],
        needs_boost: false,
    },
    RelationSeed {
        source: "watermark-pdf",
        workflow: &["protect-pdf"],
        complementary: &[],
        alternatives: &[],
        needs_boost: true,
    },
];

const EDITORIAL_SEEDS: &[(&str, &str)] = &[
    ("guides/secure-your-pdfs", "unlock-pdf"),
    ("guides/secure-your-pdfs", "protect-pdf"),
    ("guides/iphone-photos", "heic-to-jpg"),
    ("guides/scanning-documents", "rotate-pdf"),
];

pub fn demo_catalog() -> Result<Catalog, DomainError> {
    let items = TOOL_SEEDS
        .iter()
        .map(|seed| {
            let item = Item::new(ItemId::parse(seed.id)?, seed.categories.iter().copied());
            Ok(match seed.label {
                Some(label) => item.with_label(label),
                None => item,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    Catalog::new(items)
}

pub fn demo_relationships() -> Result<RelationshipGraph, DomainError> {
    let mut edges = HashMap::with_capacity(RELATION_SEEDS.len());
    for seed in RELATION_SEEDS {
        edges.insert(
            ItemId::parse(seed.source)?,
            RelationshipEdge {
                workflow: parse_ids(seed.workflow)?,
                complementary: parse_ids(seed.complementary)?,
                alternatives: parse_ids(seed.alternatives)?,
                needs_boost: seed.needs_boost,
            },
        );
    }
    Ok(RelationshipGraph::new(edges))
}

pub fn demo_editorial() -> Result<Vec<LinkEdge>, DomainError> {
    EDITORIAL_SEEDS
        .iter()
        .map(|(from, to)| Ok(LinkEdge { from: (*from).to_owned(), to: ItemId::parse(*to)? }))
        .collect()
}

fn parse_ids(raw: &[&str]) -> Result<Vec<ItemId>, DomainError> {
    raw.iter().map(|id| ItemId::parse(*id)).collect()
}

pub mod item;
pub mod relationship;

pub use item::{Catalog, Item, ItemId, ItemLabel};
pub use relationship::{RelationKind, RelationshipEdge, RelationshipGraph, NO_RELATIONS};

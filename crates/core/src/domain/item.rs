use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidItemId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLabel {
    Popular,
    New,
    Featured,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub categories: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ItemLabel>,
}

impl Item {
    pub fn new<I, S>(id: ItemId, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { id, categories: categories.into_iter().map(Into::into).collect(), label: None }
    }

    pub fn with_label(mut self, label: ItemLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn is_popular(&self) -> bool {
        self.label == Some(ItemLabel::Popular)
    }

    pub fn shares_category_with(&self, other: &Item) -> bool {
        self.categories.iter().any(|category| other.categories.contains(category))
    }
}

/// Ordered, read-only item catalog. Enumeration order is the load order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Result<Self, DomainError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.categories.is_empty() {
                return Err(DomainError::MissingCategories(item.id.to_string()));
            }
            if index.insert(item.id.clone(), position).is_some() {
                return Err(DomainError::DuplicateItem(item.id.to_string()));
            }
        }
        Ok(Self { items, index })
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|position| &self.items[*position])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Resolves a raw id string against the catalog.
    pub fn lookup(&self, raw: &str) -> Option<&Item> {
        ItemId::parse(raw).ok().and_then(|id| self.get(&id))
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

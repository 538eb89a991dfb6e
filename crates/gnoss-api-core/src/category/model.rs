//! Category model
//!
//! One category as the platform reports it, and the flat directory of all
//! categories defined for a community.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A node of a community thesaurus.
///
/// Children are never part of the source data; they are derived by
/// [`CategoryTree::build`](super::CategoryTree::build).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category_id")]
    pub id: Uuid,

    /// Display name. May hold several localized variants, `text@lang|||text@lang`
    #[serde(rename = "category_name")]
    pub name: String,

    /// Parent category; `None` for roots
    #[serde(
        rename = "parent_category_id",
        default,
        deserialize_with = "deserialize_parent_id"
    )]
    pub parent_id: Option<Uuid>,
}

impl Category {
    /// Create a root category
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent category
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The platform sends roots with a null, empty or nil parent.
fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let id = Uuid::parse_str(value).map_err(serde::de::Error::custom)?;
            Ok(if id.is_nil() { None } else { Some(id) })
        }
    }
}

/// Flat list of categories defined for one community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDirectory {
    scope: String,
    categories: Vec<Category>,
}

impl CategoryDirectory {
    pub fn new(scope: impl Into<String>, categories: Vec<Category>) -> Self {
        Self {
            scope: scope.into(),
            categories,
        }
    }

    /// Community short name this directory was fetched for
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Find a category by id
    pub fn get(&self, id: &Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Category>) {
        (self.scope, self.categories)
    }
}

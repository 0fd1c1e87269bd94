use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{CanonicalKey, DatasetId};
use crate::utils::slug::slugify;

/// A single book in one dataset's catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    /// 1-based position in the dataset's canonical order
    pub order: u32,

    /// Dataset-specific short name, e.g. "John" or "1. Mose"
    pub short_name: String,

    /// Longer display name, when the catalog provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Where the book's content lives, relative to the dataset
    pub content_locator: String,
}

impl BookEntry {
    pub fn new(order: u32, short_name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            order,
            short_name: short_name.into(),
            display_name: None,
            content_locator: locator.into(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Identifier used in paths and content ids
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.short_name)
    }

    /// Display name, falling back to the short name
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.short_name)
    }
}

/// Cross-dataset identity of one logical book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalBook {
    pub key: CanonicalKey,
    pub short_names: BTreeMap<DatasetId, String>,
}

impl CanonicalBook {
    #[must_use]
    pub fn short_name(&self, dataset: DatasetId) -> Option<&str> {
        self.short_names.get(&dataset).map(String::as_str)
    }
}

/// Book names listed for one dataset under an OSIS code.
///
/// A dataset that splits one canonical unit into several files lists all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OsisNames {
    One(String),
    Many(Vec<String>),
}

impl OsisNames {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }

    #[must_use]
    pub fn is_split(&self) -> bool {
        self.as_slice().len() > 1
    }
}

/// Alignment of one OSIS code across datasets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsisEntry {
    pub osis_code: String,
    pub books: BTreeMap<DatasetId, OsisNames>,
}

impl OsisEntry {
    /// Names listed for `dataset`, empty when the dataset lacks the unit
    #[must_use]
    pub fn names(&self, dataset: DatasetId) -> &[String] {
        self.books
            .get(&dataset)
            .map(OsisNames::as_slice)
            .unwrap_or(&[])
    }

    /// True when `dataset` lists a name folding to `slug`
    #[must_use]
    pub fn lists(&self, dataset: DatasetId, slug: &str) -> bool {
        self.names(dataset).iter().any(|name| slugify(name) == slug)
    }
}

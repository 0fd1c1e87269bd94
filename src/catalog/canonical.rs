//! Cross-dataset book identity.
//!
//! Two overlapping maps describe which books correspond across datasets:
//!
//! - the **flat map**: canonical key → one short name per dataset
//! - the **OSIS map**: OSIS code → one or several short names per dataset, for
//!   editions that split a unit into several files
//!
//! [`CanonicalRegistry`] asks a chain of [`BookResolver`]s in turn (OSIS first, then
//! the flat map) and returns the first non-empty answer.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::core::book::{CanonicalBook, OsisEntry};
use crate::core::types::{CanonicalKey, DatasetId};
use crate::utils::slug::{same_book, slugify};

/// What a resolver is asked
#[derive(Debug, Clone, Copy)]
pub struct ResolveQuery<'a> {
    pub key: &'a CanonicalKey,
    pub target: DatasetId,
    /// A dataset's own book slug for the same book, used to find the OSIS code
    pub anchor: Option<(DatasetId, &'a str)>,
}

impl<'a> ResolveQuery<'a> {
    #[must_use]
    pub fn new(key: &'a CanonicalKey, target: DatasetId) -> Self {
        Self {
            key,
            target,
            anchor: None,
        }
    }

    #[must_use]
    pub fn anchored(mut self, dataset: DatasetId, slug: &'a str) -> Self {
        self.anchor = Some((dataset, slug));
        self
    }
}

/// Which resolver answered, and with which short names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub resolver: &'static str,
    pub names: Vec<String>,
}

impl Resolution {
    /// True when the dataset lists several files for the unit
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.names.len() > 1
    }
}

/// One link in the resolution chain
pub trait BookResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Short names of the target dataset's book(s), empty when unknown
    fn resolve(&self, query: &ResolveQuery<'_>) -> Vec<String>;
}

impl<T: BookResolver + ?Sized> BookResolver for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resolve(&self, query: &ResolveQuery<'_>) -> Vec<String> {
        (**self).resolve(query)
    }
}

/// Resolves through the OSIS map
#[derive(Debug)]
pub struct OsisResolver {
    entries: Vec<OsisEntry>,
    /// (dataset, book slug) -> entry index
    by_slug: HashMap<(DatasetId, String), usize>,
    /// canonical key -> entry index, derived from the flat map
    by_key: HashMap<CanonicalKey, usize>,
}

impl OsisResolver {
    #[must_use]
    pub fn new(entries: Vec<OsisEntry>, flat: &[CanonicalBook]) -> Self {
        let mut by_slug = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            for (dataset, names) in &entry.books {
                for name in names.as_slice() {
                    // first entry listing a slug keeps it
                    by_slug.entry((*dataset, slugify(name))).or_insert(idx);
                }
            }
        }

        let mut by_key = HashMap::new();
        for book in flat {
            let found = book
                .short_names
                .iter()
                .find_map(|(dataset, name)| by_slug.get(&(*dataset, slugify(name))));
            if let Some(&idx) = found {
                by_key.insert(book.key.clone(), idx);
            }
        }

        Self {
            entries,
            by_slug,
            by_key,
        }
    }

    /// Entry listing `slug` for `dataset`
    #[must_use]
    pub fn entry_for(&self, dataset: DatasetId, slug: &str) -> Option<&OsisEntry> {
        self.by_slug
            .get(&(dataset, slug.to_string()))
            .map(|&idx| &self.entries[idx])
    }

    fn entry_for_query(&self, query: &ResolveQuery<'_>) -> Option<&OsisEntry> {
        if let Some((dataset, slug)) = query.anchor {
            if let Some(entry) = self.entry_for(dataset, slug) {
                return Some(entry);
            }
        }
        if let Some(&idx) = self.by_key.get(query.key) {
            return Some(&self.entries[idx]);
        }
        self.entry_for(query.target, &slugify(query.key.as_str()))
    }
}

impl BookResolver for OsisResolver {
    fn name(&self) -> &'static str {
        "osis"
    }

    fn resolve(&self, query: &ResolveQuery<'_>) -> Vec<String> {
        self.entry_for_query(query)
            .map(|entry| entry.names(query.target).to_vec())
            .unwrap_or_default()
    }
}

/// Resolves through the flat canonical map
#[derive(Debug)]
pub struct FlatResolver {
    by_key: HashMap<CanonicalKey, CanonicalBook>,
}

impl FlatResolver {
    #[must_use]
    pub fn new(books: &[CanonicalBook]) -> Self {
        let mut by_key = HashMap::new();
        for book in books {
            by_key.entry(book.key.clone()).or_insert_with(|| book.clone());
        }
        Self { by_key }
    }
}

impl BookResolver for FlatResolver {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn resolve(&self, query: &ResolveQuery<'_>) -> Vec<String> {
        self.by_key
            .get(query.key)
            .and_then(|book| book.short_name(query.target))
            .map(|name| vec![name.to_string()])
            .unwrap_or_default()
    }
}

/// Frozen cross-dataset identity registry
pub struct CanonicalRegistry {
    books: Vec<CanonicalBook>,
    osis: Arc<OsisResolver>,
    chain: Vec<Box<dyn BookResolver>>,
}

impl std::fmt::Debug for CanonicalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalRegistry")
            .field("books", &self.books.len())
            .field("osis_entries", &self.osis.entries.len())
            .field(
                "chain",
                &self.chain.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CanonicalRegistry {
    #[must_use]
    pub fn new(books: Vec<CanonicalBook>, osis: Vec<OsisEntry>) -> Self {
        let osis = Arc::new(OsisResolver::new(osis, &books));
        let chain: Vec<Box<dyn BookResolver>> = vec![
            Box::new(Arc::clone(&osis)),
            Box::new(FlatResolver::new(&books)),
        ];
        Self { books, osis, chain }
    }

    /// Ask each resolver in turn; `None` when none knows the book
    #[must_use]
    pub fn resolve_candidates(&self, query: &ResolveQuery<'_>) -> Option<Resolution> {
        self.chain.iter().find_map(|resolver| {
            let names = resolver.resolve(query);
            if names.is_empty() {
                None
            } else {
                tracing::debug!(
                    "Resolved '{}' for {} via {}: {:?}",
                    query.key,
                    query.target,
                    resolver.name(),
                    names
                );
                Some(Resolution {
                    resolver: resolver.name(),
                    names,
                })
            }
        })
    }

    /// The dataset's short name for a canonical book
    #[must_use]
    pub fn resolve_dataset_short_name(
        &self,
        key: &CanonicalKey,
        dataset: DatasetId,
    ) -> Option<String> {
        self.resolve_candidates(&ResolveQuery::new(key, dataset))
            .and_then(|r| r.names.into_iter().next())
    }

    /// The canonical key whose flat-map name for `dataset` folds to `book_slug`.
    ///
    /// A linear scan; book counts are small and this is not on a hot path.
    #[must_use]
    pub fn resolve_canonical_key(
        &self,
        dataset: DatasetId,
        book_slug: &str,
    ) -> Option<CanonicalKey> {
        self.books
            .iter()
            .find(|book| {
                book.short_name(dataset)
                    .is_some_and(|name| same_book(name, book_slug))
            })
            .map(|book| book.key.clone())
    }

    /// OSIS code of the unit that `dataset` files under `book_slug`
    #[must_use]
    pub fn osis_code_for(&self, dataset: DatasetId, book_slug: &str) -> Option<&str> {
        self.osis
            .entry_for(dataset, &slugify(book_slug))
            .map(|e| e.osis_code.as_str())
    }

    /// Every name `dataset` lists under the OSIS unit containing `book_slug`
    #[must_use]
    pub fn osis_siblings(&self, dataset: DatasetId, book_slug: &str) -> &[String] {
        self.osis
            .entry_for(dataset, &slugify(book_slug))
            .map(|e| e.names(dataset))
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn book(&self, key: &CanonicalKey) -> Option<&CanonicalBook> {
        self.books.iter().find(|b| &b.key == key)
    }

    #[must_use]
    pub fn books(&self) -> &[CanonicalBook] {
        &self.books
    }
}

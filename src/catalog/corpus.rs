use std::path::Path;

use once_cell::sync::OnceCell;

use crate::catalog::canonical::CanonicalRegistry;
use crate::catalog::source::{CorpusError, CorpusSource, FsCorpus};
use crate::catalog::store::{BookRoute, Dataset};
use crate::core::book::BookEntry;
use crate::core::types::{CanonicalKey, DatasetId};
use crate::utils::validation::validate_segment;

/// Lazily populated, then frozen, view of the whole corpus.
///
/// Each dataset and the canonical registry load on first use and stay cached for the
/// lifetime of the value. Every slot is independent: a failed load leaves only that
/// slot empty, and the next request tries again.
pub struct Corpus {
    source: Box<dyn CorpusSource>,
    datasets: [OnceCell<Dataset>; DatasetId::ALL.len()],
    registry: OnceCell<CanonicalRegistry>,
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<DatasetId> = DatasetId::ALL
            .into_iter()
            .filter(|id| self.datasets[id.index()].get().is_some())
            .collect();
        f.debug_struct("Corpus")
            .field("loaded", &loaded)
            .field("registry_loaded", &self.registry.get().is_some())
            .finish()
    }
}

impl Corpus {
    pub fn new(source: impl CorpusSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            datasets: Default::default(),
            registry: OnceCell::new(),
        }
    }

    /// Corpus read from a directory, see [`FsCorpus`]
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(FsCorpus::new(root.as_ref()))
    }

    /// The dataset index, loading it on first use
    ///
    /// # Errors
    ///
    /// Returns the source's `CorpusError` when the catalog cannot be read or is invalid.
    pub fn dataset(&self, id: DatasetId) -> Result<&Dataset, CorpusError> {
        self.datasets[id.index()].get_or_try_init(|| {
            tracing::debug!("Loading dataset {}", id);
            let books = self.source.books(id)?;
            let abbreviations = self.source.abbreviations(id)?;
            Dataset::from_rows(id, books, abbreviations)
        })
    }

    /// The cross-dataset registry, loading it on first use
    ///
    /// # Errors
    ///
    /// Returns the source's `CorpusError` when either map cannot be read.
    pub fn registry(&self) -> Result<&CanonicalRegistry, CorpusError> {
        self.registry.get_or_try_init(|| {
            tracing::debug!("Loading canonical book registry");
            let books = self.source.canonical_books()?;
            let osis = self.source.osis_entries()?;
            Ok(CanonicalRegistry::new(books, osis))
        })
    }

    /// Datasets that load successfully, in registration order
    pub fn available_datasets(&self) -> Vec<&Dataset> {
        DatasetId::ALL
            .into_iter()
            .filter_map(|id| match self.dataset(id) {
                Ok(ds) => Some(ds),
                Err(e) => {
                    tracing::debug!("Dataset {} unavailable: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Raw content of a book. Content is not cached.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` when the content cannot be read.
    pub fn content(&self, dataset: DatasetId, book: &BookEntry) -> Result<String, CorpusError> {
        self.source.content(dataset, &book.content_locator)
    }

    /// Canonicalize a raw URL book segment for `dataset`
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Validation` for an oversized segment and the load error
    /// when the dataset cannot be loaded.
    pub fn route_book(&self, dataset: DatasetId, segment: &str) -> Result<BookRoute, CorpusError> {
        let segment = validate_segment(segment)?;
        Ok(self.dataset(dataset)?.route_book(segment))
    }

    /// Canonical key for a dataset's book slug; the slug itself when the flat map does
    /// not list the book.
    #[must_use]
    pub fn canonical_key_for(&self, dataset: DatasetId, book_slug: &str) -> CanonicalKey {
        match self.registry() {
            Ok(registry) => registry
                .resolve_canonical_key(dataset, book_slug)
                .unwrap_or_else(|| CanonicalKey::new(book_slug)),
            Err(e) => {
                tracing::warn!("Canonical book registry unavailable: {}", e);
                CanonicalKey::new(book_slug)
            }
        }
    }
}

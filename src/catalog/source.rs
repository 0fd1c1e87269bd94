//! Read interfaces to the corpus.
//!
//! [`CorpusSource`] is the only way the rest of the crate touches corpus data. The
//! filesystem layout read by [`FsCorpus`] is:
//!
//! ```text
//! <root>/canonical.json               canonical key -> {dataset: short name}
//! <root>/osis.json                    OSIS code -> {dataset: name | [names]}
//! <root>/<dataset>/books.tsv          order, short name, display name, locator
//! <root>/<dataset>/abbreviations.tsv  short name, variants...
//! <root>/<dataset>/<locator>          XHTML content
//! ```
//!
//! [`MemoryCorpus`] holds the same data in memory for fixtures and embedding.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::book::{BookEntry, CanonicalBook, OsisEntry, OsisNames};
use crate::core::types::{CanonicalKey, DatasetId};
use crate::parsing::tsv::{self, ParseError};
use crate::utils::validation::{validate_locator, ValidationError};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse catalog of {dataset}: {source}")]
    Catalog {
        dataset: DatasetId,
        #[source]
        source: ParseError,
    },

    #[error("Invalid catalog for {dataset}: {message}")]
    InvalidCatalog { dataset: DatasetId, message: String },

    #[error("Dataset {0} is not available")]
    DatasetUnavailable(DatasetId),

    #[error("Content '{locator}' not found in {dataset}")]
    MissingContent { dataset: DatasetId, locator: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Abbreviation rows: short name followed by its spelling variants, in source order
pub type AbbreviationRows = Vec<(String, Vec<String>)>;

/// The external collaborators the corpus is read from
pub trait CorpusSource: Send + Sync {
    /// Catalog rows of a dataset, in source order
    fn books(&self, dataset: DatasetId) -> Result<Vec<BookEntry>, CorpusError>;

    /// Spelling variants per short name; an absent list is empty
    fn abbreviations(&self, dataset: DatasetId) -> Result<AbbreviationRows, CorpusError>;

    /// Flat cross-dataset map
    fn canonical_books(&self) -> Result<Vec<CanonicalBook>, CorpusError>;

    /// OSIS cross-dataset map
    fn osis_entries(&self) -> Result<Vec<OsisEntry>, CorpusError>;

    /// Raw content addressed by a catalog locator
    fn content(&self, dataset: DatasetId, locator: &str) -> Result<String, CorpusError>;
}

/// Parse `{"<key>": {"<dataset>": "<short name>"}}`, skipping unknown datasets
///
/// # Errors
///
/// Returns `CorpusError::Json` when the text is not a JSON object of that shape.
pub fn parse_canonical_json(json: &str) -> Result<Vec<CanonicalBook>, CorpusError> {
    let raw: BTreeMap<String, BTreeMap<String, String>> =
        serde_json::from_str(json).map_err(|source| CorpusError::Json {
            what: "canonical book map",
            source,
        })?;

    Ok(raw
        .into_iter()
        .map(|(key, names)| CanonicalBook {
            key: CanonicalKey::new(key),
            short_names: known_datasets(names),
        })
        .collect())
}

/// Parse `{"<OSIS>": {"<dataset>": "<name>" | ["<name>", ...]}}`, skipping unknown datasets
///
/// # Errors
///
/// Returns `CorpusError::Json` when the text is not a JSON object of that shape.
pub fn parse_osis_json(json: &str) -> Result<Vec<OsisEntry>, CorpusError> {
    let raw: BTreeMap<String, BTreeMap<String, OsisNames>> =
        serde_json::from_str(json).map_err(|source| CorpusError::Json {
            what: "OSIS map",
            source,
        })?;

    Ok(raw
        .into_iter()
        .map(|(osis_code, books)| OsisEntry {
            osis_code,
            books: known_datasets(books),
        })
        .collect())
}

fn known_datasets<T>(raw: BTreeMap<String, T>) -> BTreeMap<DatasetId, T> {
    raw.into_iter()
        .filter_map(|(dataset, value)| match dataset.parse::<DatasetId>() {
            Ok(id) => Some((id, value)),
            Err(e) => {
                tracing::warn!("Skipping mapping entry: {}", e);
                None
            }
        })
        .collect()
}

/// Corpus stored on disk
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: PathBuf,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dataset_dir(&self, dataset: DatasetId) -> PathBuf {
        self.root.join(dataset.as_str())
    }

    fn read(path: &Path) -> Result<String, CorpusError> {
        std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CorpusSource for FsCorpus {
    fn books(&self, dataset: DatasetId) -> Result<Vec<BookEntry>, CorpusError> {
        let path = self.dataset_dir(dataset).join("books.tsv");
        if !path.exists() {
            return Err(CorpusError::DatasetUnavailable(dataset));
        }
        tsv::parse_books_file(&path).map_err(|source| CorpusError::Catalog { dataset, source })
    }

    fn abbreviations(&self, dataset: DatasetId) -> Result<AbbreviationRows, CorpusError> {
        let path = self.dataset_dir(dataset).join("abbreviations.tsv");
        if !path.exists() {
            tracing::debug!("No abbreviation list for {}", dataset);
            return Ok(Vec::new());
        }
        tsv::parse_abbreviations_file(&path)
            .map_err(|source| CorpusError::Catalog { dataset, source })
    }

    fn canonical_books(&self) -> Result<Vec<CanonicalBook>, CorpusError> {
        let path = self.root.join("canonical.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        parse_canonical_json(&Self::read(&path)?)
    }

    fn osis_entries(&self) -> Result<Vec<OsisEntry>, CorpusError> {
        let path = self.root.join("osis.json");
        if !path.exists() {
            return Ok(Vec::new());
        }
        parse_osis_json(&Self::read(&path)?)
    }

    fn content(&self, dataset: DatasetId, locator: &str) -> Result<String, CorpusError> {
        let locator = validate_locator(locator)?;
        let path = self.dataset_dir(dataset).join(locator);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CorpusError::MissingContent {
                    dataset,
                    locator: locator.to_string(),
                }
            } else {
                CorpusError::Read { path, source }
            }
        })
    }
}

/// Corpus held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    books: HashMap<DatasetId, Vec<BookEntry>>,
    abbreviations: HashMap<DatasetId, AbbreviationRows>,
    canonical: Vec<CanonicalBook>,
    osis: Vec<OsisEntry>,
    content: HashMap<(DatasetId, String), String>,
}

impl MemoryCorpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog row, creating the dataset if needed
    #[must_use]
    pub fn with_book(mut self, dataset: DatasetId, book: BookEntry) -> Self {
        self.books.entry(dataset).or_default().push(book);
        self
    }

    /// Add a book row together with its content
    #[must_use]
    pub fn with_book_content(
        self,
        dataset: DatasetId,
        book: BookEntry,
        markup: impl Into<String>,
    ) -> Self {
        let locator = book.content_locator.clone();
        self.with_book(dataset, book).with_content(dataset, locator, markup)
    }

    #[must_use]
    pub fn with_abbreviations<V>(
        mut self,
        dataset: DatasetId,
        short_name: &str,
        variants: V,
    ) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
    {
        self.abbreviations
            .entry(dataset)
            .or_default()
            .push((short_name.to_string(), variants.into_iter().map(Into::into).collect()));
        self
    }

    #[must_use]
    pub fn with_canonical<'a>(
        mut self,
        key: &str,
        names: impl IntoIterator<Item = (DatasetId, &'a str)>,
    ) -> Self {
        self.canonical.push(CanonicalBook {
            key: CanonicalKey::new(key),
            short_names: names
                .into_iter()
                .map(|(d, n)| (d, n.to_string()))
                .collect(),
        });
        self
    }

    #[must_use]
    pub fn with_osis(
        mut self,
        osis_code: &str,
        books: impl IntoIterator<Item = (DatasetId, OsisNames)>,
    ) -> Self {
        self.osis.push(OsisEntry {
            osis_code: osis_code.to_string(),
            books: books.into_iter().collect(),
        });
        self
    }

    #[must_use]
    pub fn with_content(
        mut self,
        dataset: DatasetId,
        locator: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        self.content.insert((dataset, locator.into()), markup.into());
        self
    }
}

impl CorpusSource for MemoryCorpus {
    fn books(&self, dataset: DatasetId) -> Result<Vec<BookEntry>, CorpusError> {
        self.books
            .get(&dataset)
            .cloned()
            .ok_or(CorpusError::DatasetUnavailable(dataset))
    }

    fn abbreviations(&self, dataset: DatasetId) -> Result<AbbreviationRows, CorpusError> {
        Ok(self.abbreviations.get(&dataset).cloned().unwrap_or_default())
    }

    fn canonical_books(&self) -> Result<Vec<CanonicalBook>, CorpusError> {
        Ok(self.canonical.clone())
    }

    fn osis_entries(&self) -> Result<Vec<OsisEntry>, CorpusError> {
        Ok(self.osis.clone())
    }

    fn content(&self, dataset: DatasetId, locator: &str) -> Result<String, CorpusError> {
        self.content
            .get(&(dataset, locator.to_string()))
            .cloned()
            .ok_or_else(|| CorpusError::MissingContent {
                dataset,
                locator: locator.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_json_skips_unknown_datasets() {
        let json = r#"{"John": {"bible": "John", "bibel": "Johannes", "klingon": "x"}}"#;
        let books = parse_canonical_json(json).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].key.as_str(), "john");
        assert_eq!(books[0].short_name(DatasetId::Bibel), Some("Johannes"));
        assert_eq!(books[0].short_names.len(), 2);
    }

    #[test]
    fn test_parse_osis_json_both_shapes() {
        let json = r#"{"Dan": {"latin": "Danihel", "bible": ["Daniel", "Susanna"]}}"#;
        let entries = parse_osis_json(json).unwrap();
        assert_eq!(entries[0].osis_code, "Dan");
        assert_eq!(entries[0].names(DatasetId::Bible).len(), 2);
        assert!(entries[0].lists(DatasetId::Latin, "danihel"));
    }

    #[test]
    fn test_parse_json_errors() {
        assert!(matches!(
            parse_canonical_json("[1, 2]"),
            Err(CorpusError::Json { .. })
        ));
        assert!(matches!(
            parse_osis_json("{\"Dan\": {\"bible\": 3}}"),
            Err(CorpusError::Json { .. })
        ));
    }

    #[test]
    fn test_memory_corpus() {
        let corpus = MemoryCorpus::new()
            .with_book_content(
                DatasetId::Bible,
                BookEntry::new(1, "John", "john.xhtml"),
                "<section/>",
            )
            .with_abbreviations(DatasetId::Bible, "John", ["Jn"]);

        assert_eq!(corpus.books(DatasetId::Bible).unwrap().len(), 1);
        assert!(matches!(
            corpus.books(DatasetId::Latin),
            Err(CorpusError::DatasetUnavailable(DatasetId::Latin))
        ));
        assert_eq!(corpus.abbreviations(DatasetId::Bible).unwrap()[0].1, vec!["Jn"]);
        assert!(corpus.abbreviations(DatasetId::Bibel).unwrap().is_empty());
        assert_eq!(corpus.content(DatasetId::Bible, "john.xhtml").unwrap(), "<section/>");
        assert!(matches!(
            corpus.content(DatasetId::Bible, "mark.xhtml"),
            Err(CorpusError::MissingContent { .. })
        ));
    }

    #[test]
    fn test_fs_corpus_rejects_traversal() {
        let corpus = FsCorpus::new("/nonexistent");
        assert!(matches!(
            corpus.content(DatasetId::Bible, "../../etc/passwd"),
            Err(CorpusError::Validation(ValidationError::InvalidLocator))
        ));
        assert!(matches!(
            corpus.books(DatasetId::Bible),
            Err(CorpusError::DatasetUnavailable(DatasetId::Bible))
        ));
    }
}

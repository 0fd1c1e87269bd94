use serde::Serialize;
use thiserror::Error;

use crate::catalog::source::CorpusError;
use crate::core::reference::{Reference, ReferenceError};
use crate::core::types::{CanonicalKey, DatasetId};
use crate::parsing::content::VerseFragment;

/// Default upper bound on datasets in one composite
pub const DEFAULT_MAX_DATASETS: usize = 3;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Passage not found: {0}")]
    NotFound(String),

    #[error("Invalid verse range: {0}")]
    InvalidRange(#[from] ReferenceError),

    #[error("Invalid dataset selection: {0}")]
    InvalidDatasets(String),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

/// Configuration for the interlinear composer
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Maximum number of datasets per composite
    pub max_datasets: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_datasets: DEFAULT_MAX_DATASETS,
        }
    }
}

/// What to compose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterlinearRequest {
    pub book: CanonicalKey,
    pub reference: Reference,
    /// Column order; the first dataset is primary
    pub datasets: Vec<DatasetId>,
}

impl InterlinearRequest {
    /// Build a request from raw locants.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidRange` when the locants do not form a valid
    /// reference.
    pub fn new(
        book: CanonicalKey,
        chapter: u32,
        verse_from: Option<u32>,
        verse_to: Option<u32>,
        datasets: Vec<DatasetId>,
    ) -> Result<Self, ComposeError> {
        Ok(Self {
            book,
            reference: Reference::new(chapter, verse_from, verse_to)?,
            datasets,
        })
    }

    #[must_use]
    pub fn primary(&self) -> Option<DatasetId> {
        self.datasets.first().copied()
    }
}

/// Why a dataset contributes nothing to a composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeKind {
    /// The dataset's catalog could not be loaded
    DatasetUnavailable,
    /// The dataset has no book for the canonical key
    BookMissing,
    /// The book's content could not be read or parsed
    ContentUnavailable,
    /// The book lacks the chapter; `alternatives` lists the files the dataset splits
    /// the unit into, when it does
    ChapterMissing { alternatives: Vec<String> },
}

/// A dataset left out of the composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub dataset: DatasetId,
    #[serde(flatten)]
    pub kind: NoticeKind,
}

impl Notice {
    #[must_use]
    pub fn new(dataset: DatasetId, kind: NoticeKind) -> Self {
        Self { dataset, kind }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NoticeKind::DatasetUnavailable => write!(f, "{} is not available", self.dataset),
            NoticeKind::BookMissing => write!(f, "{} does not contain this book", self.dataset),
            NoticeKind::ContentUnavailable => {
                write!(f, "{} content for this book could not be read", self.dataset)
            }
            NoticeKind::ChapterMissing { alternatives } if alternatives.is_empty() => {
                write!(f, "{} does not contain this chapter", self.dataset)
            }
            NoticeKind::ChapterMissing { alternatives } => write!(
                f,
                "{} does not contain this chapter; it divides the book into: {}",
                self.dataset,
                alternatives.join(", ")
            ),
        }
    }
}

/// One active dataset's column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub dataset: DatasetId,
    /// Slug of the dataset book the chapter came from
    pub book_slug: String,
    pub display_name: String,
}

/// One dataset's fragment for a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub dataset: DatasetId,
    pub fragment: Option<VerseFragment>,
}

/// One verse across all active datasets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterlinearVerse {
    pub number: u32,
    /// In column order
    pub cells: Vec<Cell>,
}

impl InterlinearVerse {
    #[must_use]
    pub fn cell(&self, dataset: DatasetId) -> Option<&VerseFragment> {
        self.cells
            .iter()
            .find(|c| c.dataset == dataset)
            .and_then(|c| c.fragment.as_ref())
    }
}

/// Where the presentation layer should focus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    Highlight {
        from: u32,
        to: u32,
        /// Primary verse ids in the range
        anchors: Vec<String>,
    },
    ChapterScroll {
        anchor: String,
    },
}

/// A verse-aligned multi-dataset rendering of one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interlinear {
    pub book: CanonicalKey,
    pub chapter: u32,
    /// Primary chapter heading, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub columns: Vec<Column>,
    pub verses: Vec<InterlinearVerse>,
    pub notices: Vec<Notice>,
    pub target: Target,
}

impl Interlinear {
    /// Datasets that contributed verses, in column order
    #[must_use]
    pub fn active_datasets(&self) -> Vec<DatasetId> {
        self.columns.iter().map(|c| c.dataset).collect()
    }

    #[must_use]
    pub fn verse(&self, number: u32) -> Option<&InterlinearVerse> {
        self.verses.iter().find(|v| v.number == number)
    }
}

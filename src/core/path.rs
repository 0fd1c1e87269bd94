//! Passage paths: `<dataset[-dataset...]>/<book-slug>/<chapter>[:<verse>[-<verse>]]`.
//!
//! A hyphen-joined dataset list gives the column order of an interlinear view,
//! the first id being the primary dataset.

use thiserror::Error;

use crate::core::reference::{Reference, ReferenceError};
use crate::core::types::{DatasetId, UnknownDataset};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Malformed passage path '{0}'")]
    Malformed(String),

    #[error(transparent)]
    UnknownDataset(#[from] UnknownDataset),

    #[error("At most {max} datasets can be combined, got {got}")]
    TooManyDatasets { max: usize, got: usize },

    #[error("Dataset '{0}' listed more than once")]
    DuplicateDataset(DatasetId),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Parse a hyphen-joined dataset list such as `bible-bibel`.
///
/// # Errors
///
/// Returns `PathError` for unknown ids, repeats, an empty list, or more ids than there
/// are registered datasets.
pub fn parse_dataset_list(segment: &str) -> Result<Vec<DatasetId>, PathError> {
    if segment.trim().is_empty() {
        return Err(PathError::Malformed(segment.to_string()));
    }

    let mut datasets = Vec::new();
    for part in segment.split('-') {
        let id: DatasetId = part.parse()?;
        if datasets.contains(&id) {
            return Err(PathError::DuplicateDataset(id));
        }
        datasets.push(id);
    }

    if datasets.len() > DatasetId::ALL.len() {
        return Err(PathError::TooManyDatasets {
            max: DatasetId::ALL.len(),
            got: datasets.len(),
        });
    }
    Ok(datasets)
}

/// Join datasets back into a path segment
#[must_use]
pub fn format_dataset_list(datasets: &[DatasetId]) -> String {
    datasets
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

/// A parsed passage path. The book segment is kept raw; canonicalizing it needs the
/// dataset catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassagePath {
    pub datasets: Vec<DatasetId>,
    pub book: String,
    pub reference: Reference,
}

impl PassagePath {
    /// # Errors
    ///
    /// Returns `PathError` when the path does not have exactly three segments or any
    /// segment is invalid.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let parts: Vec<&str> = path.trim().trim_matches('/').split('/').collect();
        let [datasets, book, locant] = parts.as_slice() else {
            return Err(PathError::Malformed(path.to_string()));
        };
        if book.trim().is_empty() {
            return Err(PathError::Malformed(path.to_string()));
        }

        Ok(Self {
            datasets: parse_dataset_list(datasets)?,
            book: (*book).to_string(),
            reference: Reference::parse_locant(locant)?,
        })
    }

    #[must_use]
    pub fn primary(&self) -> DatasetId {
        // parse_dataset_list never yields an empty list
        self.datasets[0]
    }

    /// Same path with another book segment
    #[must_use]
    pub fn with_book(&self, book: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            ..self.clone()
        }
    }
}

impl std::fmt::Display for PassagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "/{}/{}/{}",
            format_dataset_list(&self.datasets),
            self.book,
            self.reference
        )
    }
}

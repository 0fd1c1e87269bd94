use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::catalog::abbreviations::AbbreviationTable;
use crate::catalog::source::{AbbreviationRows, CorpusError};
use crate::core::book::BookEntry;
use crate::core::types::DatasetId;
use crate::utils::slug::slugify;

/// One dataset's book catalog with its indexes
#[derive(Debug)]
pub struct Dataset {
    pub id: DatasetId,

    /// Books sorted by canonical order
    books: Vec<BookEntry>,

    /// Index: book slug -> index in books vec
    slug_to_index: HashMap<String, usize>,

    /// Index: spelling variant -> short name
    abbreviations: AbbreviationTable,
}

/// How a raw URL book segment relates to the dataset's canonical slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "slug", rename_all = "snake_case")]
pub enum BookRoute {
    /// Already the canonical slug
    Canonical(String),
    /// Known book written differently; redirect to this slug
    Redirect(String),
    NotFound,
}

impl Dataset {
    /// Build the index from catalog rows and abbreviation rows.
    ///
    /// Books are ordered by `order`. The abbreviation table is filled from the
    /// abbreviation rows first, then each book's short and display names in order.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::InvalidCatalog` on duplicate orders, duplicate or empty
    /// slugs, or an empty catalog.
    pub fn from_rows(
        id: DatasetId,
        mut books: Vec<BookEntry>,
        abbreviations: AbbreviationRows,
    ) -> Result<Self, CorpusError> {
        let invalid = |message: String| CorpusError::InvalidCatalog {
            dataset: id,
            message,
        };

        if books.is_empty() {
            return Err(invalid("catalog lists no books".to_string()));
        }

        books.sort_by_key(|b| b.order);

        let mut orders = HashSet::new();
        let mut slug_to_index = HashMap::new();
        for (idx, book) in books.iter().enumerate() {
            if !orders.insert(book.order) {
                return Err(invalid(format!("duplicate order {}", book.order)));
            }
            let slug = book.slug();
            if slug.is_empty() {
                return Err(invalid(format!(
                    "book '{}' has an empty slug",
                    book.short_name
                )));
            }
            if slug_to_index.insert(slug.clone(), idx).is_some() {
                return Err(invalid(format!("duplicate book slug '{slug}'")));
            }
        }

        let mut table = AbbreviationTable::from_rows(abbreviations);
        for book in &books {
            table.insert(&book.short_name, &book.short_name);
            if let Some(display_name) = &book.display_name {
                table.insert(display_name, &book.short_name);
            }
        }

        tracing::debug!(
            "Indexed {} with {} books and {} name variants",
            id,
            books.len(),
            table.len()
        );

        Ok(Self {
            id,
            books,
            slug_to_index,
            abbreviations: table,
        })
    }

    #[must_use]
    pub fn locale(&self) -> &'static str {
        self.id.locale()
    }

    /// Books in canonical order
    #[must_use]
    pub fn books(&self) -> &[BookEntry] {
        &self.books
    }

    /// Look up a book by any name folding to its slug
    #[must_use]
    pub fn book(&self, name: &str) -> Option<&BookEntry> {
        self.slug_to_index
            .get(&slugify(name))
            .map(|&idx| &self.books[idx])
    }

    #[must_use]
    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    /// Look up a book through the abbreviation table
    #[must_use]
    pub fn book_by_variant(&self, variant: &str) -> Option<&BookEntry> {
        self.abbreviations
            .lookup(variant)
            .and_then(|short_name| self.book(short_name))
    }

    /// Map a raw URL book segment to the canonical slug.
    ///
    /// The segment is first compared by slug, then looked up as a spelling variant
    /// (with hyphens read as spaces, so `1-mo` finds the variant `1 Mo`).
    #[must_use]
    pub fn route_book(&self, segment: &str) -> BookRoute {
        if let Some(book) = self.book(segment) {
            let slug = book.slug();
            return if slug == segment {
                BookRoute::Canonical(slug)
            } else {
                BookRoute::Redirect(slug)
            };
        }

        let spaced = segment.replace('-', " ");
        match self
            .book_by_variant(segment)
            .or_else(|| self.book_by_variant(&spaced))
        {
            Some(book) => BookRoute::Redirect(book.slug()),
            None => BookRoute::NotFound,
        }
    }

    /// Number of books in the dataset
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bibel() -> Dataset {
        Dataset::from_rows(
            DatasetId::Bibel,
            vec![
                BookEntry::new(43, "Johannes", "johannes.xhtml")
                    .with_display_name("Das Evangelium nach Johannes"),
                BookEntry::new(1, "1. Mose", "1mose.xhtml").with_display_name("Genesis"),
            ],
            vec![
                ("1. Mose".to_string(), vec!["1 Mo".to_string(), "Gen".to_string()]),
                ("Johannes".to_string(), vec!["Joh".to_string(), "Jn".to_string()]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_books_sorted_by_order() {
        let ds = bibel();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.books()[0].short_name, "1. Mose");
        assert_eq!(ds.books()[1].short_name, "Johannes");
        assert_eq!(ds.locale(), "de");
    }

    #[test]
    fn test_lookup_by_slug_and_variant() {
        let ds = bibel();
        assert_eq!(ds.book("1-mose").unwrap().order, 1);
        assert_eq!(ds.book("1. Mose").unwrap().order, 1);
        assert_eq!(ds.book_by_variant("JOH").unwrap().short_name, "Johannes");
        // own names are implicit variants
        assert_eq!(ds.book_by_variant("johannes").unwrap().order, 43);
        assert_eq!(ds.book_by_variant("Genesis").unwrap().order, 1);
        assert!(ds.book("mark").is_none());
    }

    #[test]
    fn test_route_book() {
        let ds = bibel();
        assert_eq!(ds.route_book("johannes"), BookRoute::Canonical("johannes".into()));
        assert_eq!(ds.route_book("Johannes"), BookRoute::Redirect("johannes".into()));
        assert_eq!(ds.route_book("joh"), BookRoute::Redirect("johannes".into()));
        assert_eq!(ds.route_book("1-mo"), BookRoute::Redirect("1-mose".into()));
        assert_eq!(ds.route_book("markus"), BookRoute::NotFound);
    }

    #[test]
    fn test_invalid_catalogs() {
        let dup_order = Dataset::from_rows(
            DatasetId::Bible,
            vec![BookEntry::new(1, "A", "a"), BookEntry::new(1, "B", "b")],
            Vec::new(),
        );
        assert!(matches!(dup_order, Err(CorpusError::InvalidCatalog { .. })));

        let dup_slug = Dataset::from_rows(
            DatasetId::Bible,
            vec![BookEntry::new(1, "Song of Songs", "a"), BookEntry::new(2, "song_of_songs", "b")],
            Vec::new(),
        );
        assert!(matches!(dup_slug, Err(CorpusError::InvalidCatalog { .. })));

        let empty_slug = Dataset::from_rows(
            DatasetId::Bible,
            vec![BookEntry::new(1, "!!", "a")],
            Vec::new(),
        );
        assert!(matches!(empty_slug, Err(CorpusError::InvalidCatalog { .. })));

        assert!(Dataset::from_rows(DatasetId::Bible, Vec::new(), Vec::new()).is_err());
    }
}

use std::collections::BTreeSet;

use crate::catalog::canonical::{CanonicalRegistry, ResolveQuery};
use crate::catalog::corpus::Corpus;
use crate::catalog::source::CorpusError;
use crate::catalog::store::{BookRoute, Dataset};
use crate::core::book::BookEntry;
use crate::core::path::PassagePath;
use crate::core::types::DatasetId;
use crate::interlinear::model::{
    Cell, Column, ComposeError, ComposerConfig, Interlinear, InterlinearRequest,
    InterlinearVerse, Notice, NoticeKind, Target,
};
use crate::parsing::content::{chapter_id, extract_chapter, verse_id, ChapterContent};
use crate::utils::slug::slugify;

/// One dataset's chapter, ready to merge
#[derive(Debug)]
struct ActiveChapter<'a> {
    dataset: DatasetId,
    book: &'a BookEntry,
    content: ChapterContent,
}

/// Outcome of looking a dataset up for the requested book
enum Located<'a> {
    Books(&'a Dataset, Vec<&'a BookEntry>),
    Missing(NoticeKind),
}

/// How a passage path maps onto the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRoute {
    /// The book segment is canonical; ready to compose
    Compose(InterlinearRequest),
    /// The book is known under another slug; the canonical path
    Redirect(PassagePath),
}

/// Composes verse-aligned multi-dataset chapters
pub struct Composer<'a> {
    corpus: &'a Corpus,
    config: ComposerConfig,
}

impl<'a> Composer<'a> {
    pub fn new(corpus: &'a Corpus, config: ComposerConfig) -> Self {
        Self { corpus, config }
    }

    fn check_datasets(&self, datasets: &[DatasetId]) -> Result<(), ComposeError> {
        if datasets.is_empty() {
            return Err(ComposeError::InvalidDatasets(
                "at least one dataset is required".to_string(),
            ));
        }
        if datasets.len() > self.config.max_datasets {
            return Err(ComposeError::InvalidDatasets(format!(
                "at most {} datasets can be combined, got {}",
                self.config.max_datasets,
                datasets.len()
            )));
        }
        for (idx, dataset) in datasets.iter().enumerate() {
            if datasets[..idx].contains(dataset) {
                return Err(ComposeError::InvalidDatasets(format!(
                    "dataset '{dataset}' listed more than once"
                )));
            }
        }
        Ok(())
    }

    /// Canonicalize a passage path against its primary dataset.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidDatasets` for an invalid dataset list and
    /// `ComposeError::NotFound` when the primary dataset does not know the book.
    pub fn route(&self, path: &PassagePath) -> Result<PathRoute, ComposeError> {
        self.check_datasets(&path.datasets)?;
        let primary = path.primary();

        let slug = match self.corpus.route_book(primary, &path.book) {
            Ok(BookRoute::Canonical(slug)) => slug,
            Ok(BookRoute::Redirect(slug)) => return Ok(PathRoute::Redirect(path.with_book(slug))),
            Ok(BookRoute::NotFound) => {
                return Err(ComposeError::NotFound(format!(
                    "{} has no book '{}'",
                    primary, path.book
                )))
            }
            Err(e @ (CorpusError::DatasetUnavailable(_) | CorpusError::Validation(_))) => {
                return Err(ComposeError::NotFound(e.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(PathRoute::Compose(InterlinearRequest {
            book: self.corpus.canonical_key_for(primary, &slug),
            reference: path.reference,
            datasets: path.datasets.clone(),
        }))
    }

    /// Compose a passage path, following a book redirect once.
    ///
    /// # Errors
    ///
    /// See [`Composer::route`] and [`Composer::compose`].
    pub fn compose_path(&self, path: &PassagePath) -> Result<Interlinear, ComposeError> {
        let request = match self.route(path)? {
            PathRoute::Compose(request) => request,
            PathRoute::Redirect(canonical) => {
                tracing::debug!("Book '{}' canonicalized as '{}'", path.book, canonical.book);
                match self.route(&canonical)? {
                    PathRoute::Compose(request) => request,
                    PathRoute::Redirect(_) => {
                        return Err(ComposeError::NotFound(format!(
                            "book '{}' does not canonicalize",
                            path.book
                        )))
                    }
                }
            }
        };
        self.compose(&request)
    }

    /// Compose the requested chapter across the requested datasets.
    ///
    /// Datasets that lack the book, its content or the chapter are left out with a
    /// [`Notice`]; the primary dataset lacking the book or its content is an error.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::InvalidDatasets` for an invalid dataset list,
    /// `ComposeError::NotFound` when the primary dataset cannot supply the book, and
    /// `ComposeError::Corpus` when the canonical registry cannot be loaded.
    pub fn compose(&self, request: &InterlinearRequest) -> Result<Interlinear, ComposeError> {
        self.check_datasets(&request.datasets)?;
        let primary = request.datasets[0];
        let chapter = request.reference.chapter;
        let registry = self.corpus.registry()?;

        tracing::debug!(
            "Composing {} {} for [{}]",
            request.book,
            request.reference,
            request
                .datasets
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        // the primary dataset's own slug anchors OSIS lookups for every column
        let anchor_slug = registry
            .book(&request.book)
            .and_then(|b| b.short_name(primary))
            .map_or_else(|| slugify(request.book.as_str()), slugify);

        let mut notices = Vec::new();
        let mut active: Vec<ActiveChapter<'a>> = Vec::new();
        let mut heading = None;

        for (position, &dataset) in request.datasets.iter().enumerate() {
            let is_primary = position == 0;
            let located = self.locate(registry, request, dataset, is_primary, &anchor_slug);

            let (ds, books) = match located {
                Located::Books(ds, books) => (ds, books),
                Located::Missing(kind) if is_primary => {
                    return Err(ComposeError::NotFound(format!(
                        "{} ('{}')",
                        Notice::new(dataset, kind),
                        request.book
                    )));
                }
                Located::Missing(kind) => {
                    let notice = Notice::new(dataset, kind);
                    tracing::warn!("{}", notice);
                    notices.push(notice);
                    continue;
                }
            };

            match self.load_chapter(ds, &books, chapter, is_primary)? {
                Ok(found) => {
                    if is_primary {
                        heading = found.content.heading.clone();
                    }
                    active.push(found);
                }
                Err(kind) => {
                    let kind = match kind {
                        NoticeKind::ChapterMissing { .. } => NoticeKind::ChapterMissing {
                            alternatives: split_hint(registry, dataset, books[0]),
                        },
                        other => other,
                    };
                    let notice = Notice::new(dataset, kind);
                    tracing::warn!("{}", notice);
                    notices.push(notice);
                }
            }
        }

        let verses = merge_verses(&active, primary);
        let columns = active
            .iter()
            .map(|a| Column {
                dataset: a.dataset,
                book_slug: a.book.slug(),
                display_name: a.book.label().to_string(),
            })
            .collect();

        // highlight anchors always point into the primary column
        let primary_slug = active
            .first()
            .filter(|a| a.dataset == primary)
            .map_or(anchor_slug, |a| a.book.slug());
        let target = match request.reference.verse_bounds() {
            Some((from, to)) => Target::Highlight {
                from,
                to,
                // only verses the passage actually has
                anchors: verses
                    .iter()
                    .map(|v| v.number)
                    .filter(|n| (from..=to).contains(n))
                    .map(|v| verse_id(&primary_slug, chapter, v))
                    .collect(),
            },
            None => Target::ChapterScroll {
                anchor: chapter_id(&primary_slug, chapter),
            },
        };

        Ok(Interlinear {
            book: request.book.clone(),
            chapter,
            heading,
            columns,
            verses,
            notices,
            target,
        })
    }

    /// The dataset's candidate books for the request, in the order to try them.
    ///
    /// The primary dataset uses its own book when the anchor slug names one. Otherwise
    /// the registry chain answers, falling back to the canonical key itself.
    fn locate(
        &self,
        registry: &CanonicalRegistry,
        request: &InterlinearRequest,
        dataset: DatasetId,
        is_primary: bool,
        anchor_slug: &str,
    ) -> Located<'a> {
        let ds = match self.corpus.dataset(dataset) {
            Ok(ds) => ds,
            Err(e) => {
                tracing::debug!("Dataset {} unavailable: {}", dataset, e);
                return Located::Missing(NoticeKind::DatasetUnavailable);
            }
        };

        if is_primary {
            if let Some(book) = ds.book(anchor_slug) {
                return Located::Books(ds, vec![book]);
            }
        }

        let query =
            ResolveQuery::new(&request.book, dataset).anchored(request.datasets[0], anchor_slug);
        let names = registry
            .resolve_candidates(&query)
            .map(|r| r.names)
            .unwrap_or_else(|| {
                tracing::debug!(
                    "No registry entry for '{}' in {}, trying the key itself",
                    request.book,
                    dataset
                );
                vec![request.book.as_str().to_string()]
            });

        let books: Vec<&BookEntry> = names.iter().filter_map(|name| ds.book(name)).collect();
        if books.is_empty() {
            Located::Missing(NoticeKind::BookMissing)
        } else {
            Located::Books(ds, books)
        }
    }

    /// Try each candidate book in turn for the chapter.
    ///
    /// The outer error is terminal; the inner one becomes a notice.
    fn load_chapter(
        &self,
        ds: &'a Dataset,
        books: &[&'a BookEntry],
        chapter: u32,
        is_primary: bool,
    ) -> Result<Result<ActiveChapter<'a>, NoticeKind>, ComposeError> {
        let mut outcome = NoticeKind::ChapterMissing {
            alternatives: Vec::new(),
        };
        let mut any_content = false;

        for &book in books {
            let markup = match self.corpus.content(ds.id, book) {
                Ok(markup) => markup,
                Err(e @ CorpusError::MissingContent { .. }) => {
                    tracing::debug!("{}", e);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Reading {} content for '{}': {}", ds.id, book.short_name, e);
                    outcome = NoticeKind::ContentUnavailable;
                    continue;
                }
            };
            any_content = true;

            match extract_chapter(&markup, &book.slug(), chapter) {
                Ok(Some(content)) => {
                    return Ok(Ok(ActiveChapter {
                        dataset: ds.id,
                        book,
                        content,
                    }));
                }
                Ok(None) => {
                    tracing::debug!("{} '{}' has no chapter {}", ds.id, book.short_name, chapter);
                }
                Err(e) => {
                    tracing::warn!("Parsing {} content for '{}': {}", ds.id, book.short_name, e);
                    outcome = NoticeKind::ContentUnavailable;
                }
            }
        }

        if !any_content {
            // no candidate file could be read
            if is_primary {
                return Err(ComposeError::NotFound(format!(
                    "content for {} '{}' is missing",
                    ds.id, books[0].short_name
                )));
            }
            return Ok(Err(NoticeKind::ContentUnavailable));
        }
        Ok(Err(outcome))
    }
}

/// Files the dataset splits the book's OSIS unit into, when more than one
fn split_hint(registry: &CanonicalRegistry, dataset: DatasetId, book: &BookEntry) -> Vec<String> {
    let names = registry.osis_siblings(dataset, &book.short_name);
    if names.len() > 1 {
        names.to_vec()
    } else {
        Vec::new()
    }
}

/// Union of verse numbers across active chapters, each with every column's fragment.
///
/// Only the primary dataset's fragments keep their ids.
fn merge_verses(active: &[ActiveChapter<'_>], primary: DatasetId) -> Vec<InterlinearVerse> {
    let numbers: BTreeSet<u32> = active
        .iter()
        .flat_map(|a| a.content.verse_numbers())
        .collect();

    numbers
        .into_iter()
        .map(|number| InterlinearVerse {
            number,
            cells: active
                .iter()
                .map(|a| {
                    let fragment = a.content.verses.get(&number).cloned();
                    Cell {
                        dataset: a.dataset,
                        fragment: if a.dataset == primary {
                            fragment
                        } else {
                            fragment.map(|f| f.without_id())
                        },
                    }
                })
                .collect(),
        })
        .collect()
}

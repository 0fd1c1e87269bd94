use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::catalog::abbreviations::AbbreviationTable;
use crate::catalog::corpus::Corpus;
use crate::catalog::source::CorpusError;
use crate::catalog::store::Dataset;
use crate::core::reference::Reference;
use crate::core::types::DatasetId;
use crate::matching::resolve::resolve_book_span;
use crate::utils::slug::slugify;

/// Existing hyperlinks (with their content) and any other tag
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>|<[^>]*>").expect("valid regex"));

/// Default upper bound on the words captured in front of the chapter number
pub const DEFAULT_MAX_BOOK_WORDS: usize = 5;

/// Largest accepted `max_book_words`; larger values are clamped
pub const MAX_BOOK_WORDS: usize = 16;

/// Default CSS class on generated links
pub const DEFAULT_LINK_CLASS: &str = "scripture-ref";

/// Configuration for the reference matcher
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Maximum number of words (after an optional numeral) in a book span
    pub max_book_words: usize,
    /// Class attribute of generated anchors
    pub link_class: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_book_words: DEFAULT_MAX_BOOK_WORDS,
            link_class: DEFAULT_LINK_CLASS.to_string(),
        }
    }
}

/// One recognized citation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Book as written in the scanned text
    pub book_text: String,
    pub resolved_short_name: String,
    /// Dataset whose abbreviation table resolved the book
    pub effective_dataset: DatasetId,
    pub chapter: u32,
    pub verse_from: u32,
    /// Equal to `verse_from` for a single verse
    pub verse_to: u32,
    /// Byte range of the whole citation as captured, including words in front of
    /// `book_text`
    pub span: Range<usize>,
    /// `/<dataset>/<book-slug>/<chapter>:<verse>[-<verse>]`
    pub path: String,
}

/// Text with recognized citations turned into links
#[derive(Debug, Clone, Serialize)]
pub struct LinkedText {
    pub html: String,
    pub matches: Vec<MatchResult>,
}

/// `max_book_words` must lie in `1..=MAX_BOOK_WORDS`
fn citation_pattern(max_book_words: usize) -> Regex {
    let extra_words = max_book_words - 1;
    let pattern = format!(
        r"(?P<book>(?:\d{{1,2}}\.?\s*)?\p{{L}}[\p{{L}}\p{{M}}.]*(?:\s+\p{{L}}[\p{{L}}\p{{M}}.]*){{0,{extra_words}}})\s*(?P<chapter>\d+)\s*[:\x{{2236}}\x{{FE55}}\x{{FF1A}}]\s*(?P<from>\d+)(?:\s*[-\x{{2013}}]\s*(?P<to>\d+))?"
    );
    Regex::new(&pattern).expect("valid regex")
}

/// Byte ranges of `text` outside markup
fn text_regions(text: &str) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut cursor = 0;
    for m in MARKUP.find_iter(text) {
        if m.start() > cursor {
            regions.push(cursor..m.start());
        }
        cursor = m.end();
    }
    if cursor < text.len() {
        regions.push(cursor..text.len());
    }
    regions
}

/// Scans prose for `Book chapter:verse[-verse]` citations
pub struct ReferenceMatcher<'a> {
    corpus: &'a Corpus,
    config: MatcherConfig,
    citation: Regex,
}

impl<'a> ReferenceMatcher<'a> {
    pub fn new(corpus: &'a Corpus, mut config: MatcherConfig) -> Self {
        let words = config.max_book_words.clamp(1, MAX_BOOK_WORDS);
        if words != config.max_book_words {
            tracing::warn!(
                "max_book_words {} out of range, using {}",
                config.max_book_words,
                words
            );
            config.max_book_words = words;
        }
        let citation = citation_pattern(words);
        Self {
            corpus,
            config,
            citation,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Scanning dataset first, then every other loadable dataset in registration order
    fn datasets(&self, dataset: DatasetId) -> Result<Vec<&'a Dataset>, CorpusError> {
        let mut datasets = vec![self.corpus.dataset(dataset)?];
        for other in dataset.others() {
            match self.corpus.dataset(other) {
                Ok(ds) => datasets.push(ds),
                Err(e) => tracing::debug!("Skipping {} for fallback: {}", other, e),
            }
        }
        Ok(datasets)
    }

    /// Recognize every citation in `text` without rewriting it.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` when the scanning dataset cannot be loaded.
    pub fn find_references(
        &self,
        text: &str,
        dataset: DatasetId,
    ) -> Result<Vec<MatchResult>, CorpusError> {
        let datasets = self.datasets(dataset)?;
        let tables: Vec<(DatasetId, &AbbreviationTable)> =
            datasets.iter().map(|ds| (ds.id, ds.abbreviations())).collect();

        let mut matches = Vec::new();
        for region in text_regions(text) {
            for caps in self.citation.captures_iter(&text[region.clone()]) {
                if let Some(m) = self.candidate(text, region.start, &caps, &datasets, &tables) {
                    matches.push(m);
                }
            }
        }
        Ok(matches)
    }

    /// Rewrite recognized citations as anchors.
    ///
    /// The link label is the citation exactly as captured, including any leading
    /// words in front of the resolved book name.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` when the scanning dataset cannot be loaded.
    pub fn link_references(
        &self,
        text: &str,
        dataset: DatasetId,
    ) -> Result<LinkedText, CorpusError> {
        let matches = self.find_references(text, dataset)?;

        let mut html = String::with_capacity(text.len() + matches.len() * 48);
        let mut cursor = 0;
        for m in &matches {
            html.push_str(&text[cursor..m.span.start]);
            html.push_str(&format!(
                r#"<a class="{}" href="{}">{}</a>"#,
                self.config.link_class,
                m.path,
                &text[m.span.clone()]
            ));
            cursor = m.span.end;
        }
        html.push_str(&text[cursor..]);

        Ok(LinkedText { html, matches })
    }

    fn candidate(
        &self,
        text: &str,
        offset: usize,
        caps: &Captures<'_>,
        datasets: &[&Dataset],
        tables: &[(DatasetId, &AbbreviationTable)],
    ) -> Option<MatchResult> {
        let whole = caps.get(0)?;
        let start = offset + whole.start();
        let end = offset + whole.end();

        if text[..start].chars().next_back().is_some_and(char::is_alphabetic)
            || text[end..].chars().next().is_some_and(char::is_alphabetic)
        {
            return None;
        }

        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
        let chapter = number("chapter")?;
        let from = number("from")?;
        let to = match caps.name("to") {
            Some(_) => Some(number("to")?),
            None => None,
        };
        let reference = match Reference::new(chapter, Some(from), to) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Ignoring citation '{}': {}", whole.as_str(), e);
                return None;
            }
        };

        let book = caps.name("book")?;
        let resolution = resolve_book_span(book.as_str(), tables);
        let Some(resolved) = resolution.resolved else {
            tracing::debug!(
                "Unresolved book span '{}', tried {:?}",
                book.as_str(),
                resolution.candidates
            );
            return None;
        };

        let slug = datasets
            .iter()
            .find(|ds| ds.id == resolved.dataset)
            .and_then(|ds| ds.book(&resolved.short_name))
            .map_or_else(|| slugify(&resolved.short_name), |b| b.slug());
        let (verse_from, verse_to) = reference.verse_bounds()?;

        Some(MatchResult {
            book_text: resolved.text,
            resolved_short_name: resolved.short_name,
            effective_dataset: resolved.dataset,
            chapter,
            verse_from,
            verse_to,
            span: start..end,
            path: format!("/{}/{}/{}", resolved.dataset, slug, reference),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::MemoryCorpus;
    use crate::core::book::BookEntry;

    fn corpus() -> Corpus {
        Corpus::new(
            MemoryCorpus::new()
                .with_book(DatasetId::Bible, BookEntry::new(1, "Genesis", "gen.xhtml"))
                .with_book(DatasetId::Bible, BookEntry::new(43, "John", "john.xhtml"))
                .with_book(DatasetId::Bible, BookEntry::new(45, "Romans", "rom.xhtml"))
                .with_abbreviations(DatasetId::Bible, "Genesis", ["Gen", "Gn"])
                .with_abbreviations(DatasetId::Bible, "John", ["Jn"])
                .with_abbreviations(DatasetId::Bible, "Romans", ["Rom"])
                .with_book(DatasetId::Bibel, BookEntry::new(1, "1. Mose", "1mose.xhtml"))
                .with_abbreviations(DatasetId::Bibel, "1. Mose", ["1 Mo", "1 Mose"]),
        )
    }

    fn matcher(corpus: &Corpus) -> ReferenceMatcher<'_> {
        ReferenceMatcher::new(corpus, MatcherConfig::default())
    }

    #[test]
    fn test_single_verse() {
        let corpus = corpus();
        let found = matcher(&corpus).find_references("John 3:16", DatasetId::Bible).unwrap();
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.book_text, "John");
        assert_eq!(m.chapter, 3);
        assert_eq!((m.verse_from, m.verse_to), (16, 16));
        assert_eq!(m.path, "/bible/john/3:16");
        assert_eq!(m.span, 0..9);
    }

    #[test]
    fn test_range_and_zero_verse() {
        let corpus = corpus();
        let matcher = matcher(&corpus);
        let found = matcher.find_references("Romans 8:1-2", DatasetId::Bible).unwrap();
        assert_eq!((found[0].verse_from, found[0].verse_to), (1, 2));
        assert_eq!(found[0].path, "/bible/romans/8:1-2");

        assert!(matcher.find_references("Gen 1:0", DatasetId::Bible).unwrap().is_empty());
        assert!(matcher.find_references("Gen 0:1", DatasetId::Bible).unwrap().is_empty());
        assert!(matcher.find_references("Rom 8:3-2", DatasetId::Bible).unwrap().is_empty());
    }

    #[test]
    fn test_unicode_colons_and_en_dash() {
        let corpus = corpus();
        let matcher = matcher(&corpus);
        for text in ["Jn 3\u{2236}16", "Jn 3\u{FE55}16", "Jn 3\u{FF1A}16"] {
            let found = matcher.find_references(text, DatasetId::Bible).unwrap();
            assert_eq!(found.len(), 1, "{text}");
        }
        let found = matcher.find_references("Rom 8:1\u{2013}4", DatasetId::Bible).unwrap();
        assert_eq!(found[0].verse_to, 4);
    }

    #[test]
    fn test_letter_boundaries() {
        let corpus = corpus();
        let matcher = matcher(&corpus);
        assert!(matcher.find_references("John 3:16a", DatasetId::Bible).unwrap().is_empty());
        assert!(matcher.find_references("x1. Mose 1:1", DatasetId::Bibel).unwrap().is_empty());
        assert_eq!(matcher.find_references("(John 3:16)", DatasetId::Bible).unwrap().len(), 1);
    }

    #[test]
    fn test_existing_links_untouched() {
        let corpus = corpus();
        let text = r#"<a href="/x">John 3:16</a> and John 3:16"#;
        let linked = matcher(&corpus).link_references(text, DatasetId::Bible).unwrap();
        assert_eq!(linked.matches.len(), 1);
        assert_eq!(
            linked.html,
            r#"<a href="/x">John 3:16</a> <a class="scripture-ref" href="/bible/john/3:16">and John 3:16</a>"#
        );
    }

    #[test]
    fn test_label_keeps_leading_words() {
        let corpus = corpus();
        let linked = matcher(&corpus)
            .link_references("<p>as in John 3:16.</p>", DatasetId::Bible)
            .unwrap();
        assert_eq!(
            linked.html,
            r#"<p><a class="scripture-ref" href="/bible/john/3:16">as in John 3:16</a>.</p>"#
        );
        assert_eq!(linked.matches[0].book_text, "John");
        assert_eq!(linked.matches[0].span, 3..18);
    }

    #[test]
    fn test_cross_dataset_fallback() {
        let corpus = corpus();
        let found = matcher(&corpus)
            .find_references("see 1. Mose 1:1", DatasetId::Bible)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].effective_dataset, DatasetId::Bibel);
        assert_eq!(found[0].book_text, "1. Mose");
        assert_eq!(found[0].span, 4..15);
        assert_eq!(found[0].path, "/bibel/1-mose/1:1");
    }

    #[test]
    fn test_unresolvable_left_as_text() {
        let corpus = corpus();
        let text = "Hezekiah 3:16";
        let linked = matcher(&corpus).link_references(text, DatasetId::Bible).unwrap();
        assert!(linked.matches.is_empty());
        assert_eq!(linked.html, text);
    }

    #[test]
    fn test_custom_link_class() {
        let corpus = corpus();
        let config = MatcherConfig {
            link_class: "ref".to_string(),
            ..MatcherConfig::default()
        };
        let linked = ReferenceMatcher::new(&corpus, config)
            .link_references("Jn 1:1", DatasetId::Bible)
            .unwrap();
        assert_eq!(linked.html, r#"<a class="ref" href="/bible/john/1:1">Jn 1:1</a>"#);
    }

    #[test]
    fn test_max_book_words_is_clamped() {
        let corpus = corpus();
        for words in [0, 2000, usize::MAX] {
            let config = MatcherConfig {
                max_book_words: words,
                ..MatcherConfig::default()
            };
            let matcher = ReferenceMatcher::new(&corpus, config);
            assert!((1..=MAX_BOOK_WORDS).contains(&matcher.config().max_book_words));
            let found = matcher.find_references("John 3:16", DatasetId::Bible).unwrap();
            assert_eq!(found[0].path, "/bible/john/3:16", "{words}");
        }
    }
}

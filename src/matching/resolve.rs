//! Book span resolution.
//!
//! A pure search over the words captured in front of a chapter number: right-aligned
//! suffixes are tried longest first against each abbreviation table in turn.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::abbreviations::{normalize_key, AbbreviationTable};
use crate::core::types::DatasetId;

static NUMERAL_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.\s*").expect("valid regex"));
static NUMERAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\s+").expect("valid regex"));

/// The suffix of a span that names a known book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBook {
    /// Byte offset of the matched suffix within the span
    pub start: usize,
    /// The suffix as written
    pub text: String,
    pub short_name: String,
    /// Dataset whose table matched
    pub dataset: DatasetId,
}

/// Outcome of [`resolve_book_span`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpanResolution {
    pub resolved: Option<ResolvedBook>,
    /// Lookup keys tried, in order, without repeats
    pub candidates: Vec<String>,
}

impl SpanResolution {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Byte offsets where each whitespace-separated word starts
fn word_starts(span: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;
    for (idx, c) in span.char_indices() {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            starts.push(idx);
            in_word = true;
        }
    }
    starts
}

/// Lookup keys for one suffix: dot-trimmed as written, then with the leading
/// numeral's dot read as a space and the reverse.
fn lookup_keys(suffix: &str) -> Vec<String> {
    let trimmed = normalize_key(suffix.trim_matches('.'));
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut keys = vec![trimmed.clone()];
    for alternative in [
        NUMERAL_DOT.replace(&trimmed, "$1 ").into_owned(),
        NUMERAL_SPACE.replace(&trimmed, "$1. ").into_owned(),
    ] {
        let alternative = normalize_key(&alternative);
        if !keys.contains(&alternative) {
            keys.push(alternative);
        }
    }
    keys
}

/// Resolve the book named at the end of `span`.
///
/// `tables` are searched in the given order, each over every suffix from longest to
/// shortest, so a match in an earlier table always wins over a longer match in a
/// later one. Callers pass the scanning dataset first.
#[must_use]
pub fn resolve_book_span(span: &str, tables: &[(DatasetId, &AbbreviationTable)]) -> SpanResolution {
    let starts = word_starts(span);
    let suffixes: Vec<(usize, &str, Vec<String>)> = starts
        .iter()
        .map(|&start| {
            let suffix = span[start..].trim_end();
            (start, suffix, lookup_keys(suffix))
        })
        .collect();

    let mut resolution = SpanResolution::default();
    for key in suffixes.iter().flat_map(|(_, _, keys)| keys) {
        if !resolution.candidates.contains(key) {
            resolution.candidates.push(key.clone());
        }
    }

    for (dataset, table) in tables {
        for (start, suffix, keys) in &suffixes {
            if let Some(short_name) = keys.iter().find_map(|k| table.lookup(k)) {
                resolution.resolved = Some(ResolvedBook {
                    start: *start,
                    text: (*suffix).to_string(),
                    short_name: short_name.to_string(),
                    dataset: *dataset,
                });
                return resolution;
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> AbbreviationTable {
        AbbreviationTable::from_rows([
            ("John", vec!["John", "Jn", "Joh"]),
            ("1 John", vec!["1 John", "1 Jn"]),
            ("Song of Songs", vec!["Song of Songs", "Song"]),
        ])
    }

    fn german() -> AbbreviationTable {
        AbbreviationTable::from_rows([
            ("1. Mose", vec!["1. Mose", "1 Mo"]),
            ("Johannes", vec!["Johannes", "Joh"]),
        ])
    }

    #[test]
    fn test_longest_suffix_wins() {
        let en = english();
        let r = resolve_book_span("read 1 John", &[(DatasetId::Bible, &en)]);
        let book = r.resolved.unwrap();
        assert_eq!(book.short_name, "1 John");
        assert_eq!(book.start, 5);
        assert_eq!(book.text, "1 John");
    }

    #[test]
    fn test_leading_prose_is_dropped() {
        let en = english();
        let r = resolve_book_span("as written in the Song of Songs", &[(DatasetId::Bible, &en)]);
        let book = r.resolved.unwrap();
        assert_eq!(book.short_name, "Song of Songs");
        assert_eq!(&"as written in the Song of Songs"[book.start..], "Song of Songs");
    }

    #[test]
    fn test_dot_trimmed_and_case_insensitive() {
        let en = english();
        let r = resolve_book_span("JN.", &[(DatasetId::Bible, &en)]);
        assert_eq!(r.resolved.unwrap().short_name, "John");
    }

    #[test]
    fn test_numeral_dot_normalization() {
        let de = german();
        let r = resolve_book_span("1. Mo", &[(DatasetId::Bibel, &de)]);
        assert_eq!(r.resolved.unwrap().short_name, "1. Mose");
        assert!(r.candidates.contains(&"1 mo".to_string()));

        let r = resolve_book_span("1 Mose", &[(DatasetId::Bibel, &de)]);
        assert_eq!(r.resolved.unwrap().short_name, "1. Mose");
    }

    #[test]
    fn test_primary_table_before_fallback() {
        let (en, de) = (english(), german());
        // "Joh" is in both tables; the first one listed wins
        let r = resolve_book_span("Joh", &[(DatasetId::Bibel, &de), (DatasetId::Bible, &en)]);
        let book = r.resolved.unwrap();
        assert_eq!(book.dataset, DatasetId::Bibel);
        assert_eq!(book.short_name, "Johannes");

        let r = resolve_book_span("Jn", &[(DatasetId::Bibel, &de), (DatasetId::Bible, &en)]);
        assert_eq!(r.resolved.unwrap().dataset, DatasetId::Bible);
    }

    #[test]
    fn test_unresolved_reports_candidates() {
        let en = english();
        let r = resolve_book_span("see Hezekiah", &[(DatasetId::Bible, &en)]);
        assert!(!r.is_resolved());
        assert_eq!(r.candidates, vec!["see hezekiah", "hezekiah"]);
    }
}

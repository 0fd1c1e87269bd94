//! Scripture citation recognition and linking.
//!
//! - [`ReferenceMatcher`]: scans prose for `Book chapter:verse[-verse]` citations
//! - [`resolve_book_span`]: the pure book-name search behind each candidate
//!
//! ## Matching
//!
//! A candidate is an optional one or two digit numeral, up to
//! [`MatcherConfig::max_book_words`] words, a chapter number, a colon (or one of its
//! Unicode look-alikes), a verse and an optional range end. Candidates touching a
//! letter on either side, with a zero chapter or verse, or with a range that runs
//! backwards are ignored.
//!
//! The book words are resolved by trying right-aligned suffixes, longest first,
//! against the scanning dataset's abbreviation table and then against every other
//! dataset's table in registration order. The dataset whose table matched becomes the
//! link target. Nothing inside markup or an existing link is touched.
//!
//! ## Example
//!
//! ```rust
//! use interlinear::catalog::corpus::Corpus;
//! use interlinear::catalog::source::MemoryCorpus;
//! use interlinear::core::book::BookEntry;
//! use interlinear::core::types::DatasetId;
//! use interlinear::matching::{MatcherConfig, ReferenceMatcher};
//!
//! let corpus = Corpus::new(
//!     MemoryCorpus::new().with_book(DatasetId::Bible, BookEntry::new(43, "John", "john.xhtml")),
//! );
//! let matcher = ReferenceMatcher::new(&corpus, MatcherConfig::default());
//! let linked = matcher.link_references("See John 3:16.", DatasetId::Bible).unwrap();
//!
//! assert_eq!(linked.matches[0].path, "/bible/john/3:16");
//! assert!(linked.html.contains(r#"href="/bible/john/3:16">John 3:16</a>"#));
//! ```

pub mod engine;
pub mod resolve;

pub use engine::{LinkedText, MatchResult, MatcherConfig, ReferenceMatcher};
pub use resolve::{resolve_book_span, ResolvedBook, SpanResolution};

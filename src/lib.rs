//! # interlinear
//!
//! A library for resolving scripture citations and composing multilingual,
//! verse-aligned passages from several independently segmented editions.
//!
//! Each edition ("dataset") has its own book order, short names and content files,
//! and editions do not always agree on book boundaries: one may split a book into
//! several files that another keeps together. `interlinear` reconciles these through a
//! flat canonical book map and an OSIS map, recognizes citations in free text, and
//! merges one chapter from up to three datasets verse by verse.
//!
//! ## Features
//!
//! - **Citation linking**: Finds `Book chapter:verse[-verse]` in prose, Unicode aware
//! - **Abbreviation fallback**: Book names unknown to one dataset are tried in the others
//! - **Segmentation aware**: Split books are reconciled through OSIS codes
//! - **Graceful degradation**: Missing books or chapters become notices, not failures
//! - **Quote normalization**: Balances quotation marks for excerpts
//!
//! ## Example
//!
//! ```rust,no_run
//! use interlinear::{Composer, ComposerConfig, Corpus, PassagePath};
//!
//! // Open a corpus directory
//! let corpus = Corpus::open("corpus");
//!
//! // English and German side by side
//! let path = PassagePath::parse("bible-bibel/john/3:16-18").unwrap();
//! let composer = Composer::new(&corpus, ComposerConfig::default());
//! let composite = composer.compose_path(&path).unwrap();
//!
//! for verse in &composite.verses {
//!     for cell in &verse.cells {
//!         if let Some(fragment) = &cell.fragment {
//!             println!("{} {}: {}", verse.number, cell.dataset, fragment.plain_text());
//!         }
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Dataset indexes, abbreviation tables and the canonical book registry
//! - [`core`]: Core data types for datasets, books, references and passage paths
//! - [`matching`]: Citation recognition and linking
//! - [`interlinear`]: Verse-aligned multi-dataset composition
//! - [`parsing`]: Parsers for catalog TSV files and XHTML content
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON web API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod interlinear;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::corpus::Corpus;
pub use catalog::source::{CorpusError, CorpusSource, FsCorpus, MemoryCorpus};
pub use crate::core::path::PassagePath;
pub use crate::core::reference::Reference;
pub use crate::core::types::*;
pub use crate::interlinear::{ComposeError, Composer, ComposerConfig, Interlinear};
pub use matching::engine::{MatchResult, MatcherConfig, ReferenceMatcher};
pub use utils::quotes::{QuoteNormalizer, QuoteStyle};
pub use utils::slug::slugify;

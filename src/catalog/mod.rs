//! Dataset catalogs and cross-dataset book identity.
//!
//! A [`Corpus`] owns everything loaded from the corpus source:
//!
//! - one [`Dataset`] per edition: ordered books, slug index, abbreviation table
//! - the [`CanonicalRegistry`]: flat canonical map plus OSIS map
//!
//! Each part loads on first use and is immutable afterwards, so a `Corpus` can be
//! shared across threads behind an `Arc`.
//!
//! ## Example
//!
//! ```rust
//! use interlinear::catalog::corpus::Corpus;
//! use interlinear::catalog::source::MemoryCorpus;
//! use interlinear::core::book::BookEntry;
//! use interlinear::core::types::{CanonicalKey, DatasetId};
//!
//! let corpus = Corpus::new(
//!     MemoryCorpus::new()
//!         .with_book(DatasetId::Bibel, BookEntry::new(1, "1. Mose", "1mose.xhtml"))
//!         .with_canonical("genesis", [(DatasetId::Bibel, "1. Mose")]),
//! );
//!
//! let bibel = corpus.dataset(DatasetId::Bibel).unwrap();
//! assert_eq!(bibel.book("1-mose").unwrap().order, 1);
//!
//! let registry = corpus.registry().unwrap();
//! let name = registry.resolve_dataset_short_name(&CanonicalKey::new("genesis"), DatasetId::Bibel);
//! assert_eq!(name.as_deref(), Some("1. Mose"));
//! ```
//!
//! [`Corpus`]: corpus::Corpus
//! [`Dataset`]: store::Dataset
//! [`CanonicalRegistry`]: canonical::CanonicalRegistry

pub mod abbreviations;
pub mod canonical;
pub mod corpus;
pub mod source;
pub mod store;

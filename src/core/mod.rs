//! Core data types for citation resolution and passage composition.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`DatasetId`]: The closed set of editions, with their registration table
//! - [`BookEntry`]: One book in a dataset's catalog
//! - [`CanonicalBook`], [`OsisEntry`]: Cross-dataset book identity
//! - [`Reference`]: A chapter with an optional verse range
//! - [`PassagePath`]: The `<datasets>/<book>/<locant>` path grammar
//!
//! ## Book naming
//!
//! Editions disagree on both names and boundaries:
//!
//! | Canonical | bible     | bibel        | latin                |
//! |-----------|-----------|--------------|----------------------|
//! | genesis   | Genesis   | 1. Mose      | Genesis              |
//! | daniel    | Daniel    | Daniel       | Danihel (14 chapters)|
//! | susanna   | Susanna   | -            | -                    |
//!
//! Names are compared through [`crate::utils::slug::slugify`] only.
//!
//! [`DatasetId`]: types::DatasetId
//! [`BookEntry`]: book::BookEntry
//! [`CanonicalBook`]: book::CanonicalBook
//! [`OsisEntry`]: book::OsisEntry
//! [`Reference`]: reference::Reference
//! [`PassagePath`]: path::PassagePath

pub mod book;
pub mod path;
pub mod reference;
pub mod types;

//! Verse-aligned composition of one chapter across several datasets.
//!
//! The first requested dataset is primary. Each dataset's book is found through the
//! canonical registry (OSIS map first, then the flat map, then the canonical key
//! itself), its chapter extracted, and the verses merged by number:
//!
//! - the verse list is the union over all datasets that supplied the chapter
//! - a dataset lacking a verse gets an empty cell
//! - only the primary dataset's fragments keep their element ids
//! - datasets that drop out are reported as [`Notice`]s, never silently
//!
//! The primary dataset lacking the book or its content fails with
//! [`ComposeError::NotFound`].

pub mod composer;
pub mod model;

pub use composer::{Composer, PathRoute};
pub use model::{
    Cell, Column, ComposeError, ComposerConfig, Interlinear, InterlinearRequest,
    InterlinearVerse, Notice, NoticeKind, Target,
};

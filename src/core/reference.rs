use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Chapter must be greater than zero")]
    ZeroChapter,

    #[error("Verse must be greater than zero")]
    ZeroVerse,

    #[error("Verse range end given without a start")]
    MissingVerseStart,

    #[error("Invalid verse range {from}-{to}: end precedes start")]
    InvalidRange { from: u32, to: u32 },

    #[error("Malformed reference '{0}'")]
    Malformed(String),
}

impl ReferenceError {
    /// Every rejection here is a range problem except plain syntax errors
    #[must_use]
    pub fn is_invalid_range(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

/// A chapter with an optional verse or verse range.
///
/// Construction enforces `chapter > 0`, `verse_from > 0`, and that `verse_to` only
/// appears together with `verse_from` and is not smaller than it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub chapter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_from: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_to: Option<u32>,
}

impl Reference {
    /// # Errors
    ///
    /// Returns a [`ReferenceError`] when the locants violate the invariants above.
    pub fn new(
        chapter: u32,
        verse_from: Option<u32>,
        verse_to: Option<u32>,
    ) -> Result<Self, ReferenceError> {
        if chapter == 0 {
            return Err(ReferenceError::ZeroChapter);
        }
        match (verse_from, verse_to) {
            (None, Some(_)) => return Err(ReferenceError::MissingVerseStart),
            (Some(0), _) | (_, Some(0)) => return Err(ReferenceError::ZeroVerse),
            (Some(from), Some(to)) if to < from => {
                return Err(ReferenceError::InvalidRange { from, to })
            }
            _ => {}
        }
        Ok(Self {
            chapter,
            verse_from,
            verse_to,
        })
    }

    /// Inclusive verse bounds, `None` for a whole chapter
    #[must_use]
    pub fn verse_bounds(&self) -> Option<(u32, u32)> {
        self.verse_from
            .map(|from| (from, self.verse_to.unwrap_or(from)))
    }

    /// Parse the locant part of a path: `3`, `3:16` or `3:16-18`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Malformed` for non-numeric parts and the range errors of
    /// [`Reference::new`] otherwise. A verse without a chapter (`:16`) is a range error.
    pub fn parse_locant(locant: &str) -> Result<Self, ReferenceError> {
        let locant = locant.trim();
        let number = |s: &str| {
            s.trim()
                .parse::<u32>()
                .map_err(|_| ReferenceError::Malformed(locant.to_string()))
        };

        let Some((chapter, verses)) = locant.split_once(':') else {
            return Self::new(number(locant)?, None, None);
        };

        if chapter.trim().is_empty() {
            return Err(ReferenceError::MissingVerseStart);
        }
        let chapter = number(chapter)?;

        let (from, to) = match verses.split_once('-') {
            Some((from, to)) => (number(from)?, Some(number(to)?)),
            None => (number(verses)?, None),
        };
        Self::new(chapter, Some(from), to)
    }
}

impl std::fmt::Display for Reference {
    /// Formats as the path locant; a single-verse range prints as one verse.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chapter)?;
        if let Some((from, to)) = self.verse_bounds() {
            write!(f, ":{from}")?;
            if to != from {
                write!(f, "-{to}")?;
            }
        }
        Ok(())
    }
}

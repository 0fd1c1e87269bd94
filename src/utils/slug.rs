//! Text to identifier folding.
//!
//! Every comparison of book names across datasets, URL segments and content ids goes
//! through [`slugify`]. Two raw names refer to the same book iff their slugs are equal.

/// Fold arbitrary text into a path/id safe identifier.
///
/// Lowercases, maps whitespace, `_`, `/` and `\` to `-`, drops everything outside
/// `[a-z0-9-]`, collapses runs of `-` and trims them from both ends. Total and idempotent.
///
/// # Examples
///
/// ```
/// use interlinear::utils::slug::slugify;
///
/// assert_eq!(slugify("Song of Songs"), "song-of-songs");
/// assert_eq!(slugify("SONG_OF_SONGS"), "song-of-songs");
/// assert_eq!(slugify("1. Mose"), "1-mose");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || matches!(c, '_' | '/' | '\\' | '-') {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
        // anything else is dropped without breaking the current run
    }

    slug
}

/// True when both names fold to the same non-empty slug.
#[must_use]
pub fn same_book(a: &str, b: &str) -> bool {
    let a = slugify(a);
    !a.is_empty() && a == slugify(b)
}

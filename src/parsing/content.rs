//! Chapter and verse extraction from XHTML book content.
//!
//! A book file marks each chapter with an element whose id is `<book>-ch-<chapter>`
//! and each verse with an element whose id is `<book>-<chapter>-<verse>`:
//!
//! ```text
//! <section id="john-ch-3">
//!   <h2>Chapter 3</h2>
//!   <p><span class="verse" id="john-3-16"><sup>16</sup>For God so loved…</span></p>
//! </section>
//! ```
//!
//! Verse fragments are sliced out of the source by byte offset, so their inner markup
//! is reproduced exactly as written.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static VERSE_NUMBER_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<sup\b[^>]*>.*?</sup>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed content markup at byte {position}: {message}")]
    Markup { position: u64, message: String },

    #[error("Chapter element '{0}' is not closed")]
    Unterminated(String),
}

/// One verse element lifted out of a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseFragment {
    pub number: u32,

    /// Element id; dropped when the fragment must not be externally addressable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Element name, e.g. `span`
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Inner markup, verbatim
    pub html: String,
}

impl VerseFragment {
    /// The same fragment without its id attribute
    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Re-serialize the element
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{id}\""));
        }
        if let Some(class) = &self.class {
            out.push_str(&format!(" class=\"{class}\""));
        }
        out.push('>');
        out.push_str(&self.html);
        out.push_str(&format!("</{}>", self.tag));
        out
    }

    /// Text content without markup or the leading verse number
    #[must_use]
    pub fn plain_text(&self) -> String {
        plain_text(&VERSE_NUMBER_MARKUP.replace_all(&self.html, ""))
    }
}

/// A chapter sub-document with its heading removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterContent {
    /// Text of the chapter heading element, if there was one
    pub heading: Option<String>,
    pub verses: BTreeMap<u32, VerseFragment>,
}

impl ChapterContent {
    #[must_use]
    pub fn verse_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.verses.keys().copied()
    }
}

/// Id of the chapter element for `book_slug` and `chapter`
#[must_use]
pub fn chapter_id(book_slug: &str, chapter: u32) -> String {
    format!("{book_slug}-ch-{chapter}")
}

/// Id of a verse element
#[must_use]
pub fn verse_id(book_slug: &str, chapter: u32, verse: u32) -> String {
    format!("{book_slug}-{chapter}-{verse}")
}

#[derive(Debug)]
enum Role {
    Chapter,
    Heading,
    Verse { number: u32, id: String, class: Option<String> },
    Other,
}

#[derive(Debug)]
struct Open {
    tag: String,
    role: Role,
    content_start: usize,
}

/// Extract `chapter` of the book identified by `book_slug` from `markup`.
///
/// Returns `Ok(None)` when the file has no element with the chapter id. The first
/// heading element directly inside the chapter is removed from the content and its
/// text returned separately. Verse ids that repeat keep their first occurrence.
///
/// # Errors
///
/// Returns `ContentError` if the markup is not well-formed.
pub fn extract_chapter(
    markup: &str,
    book_slug: &str,
    chapter: u32,
) -> Result<Option<ChapterContent>, ContentError> {
    let wanted_chapter = chapter_id(book_slug, chapter);
    let verse_prefix = format!("{book_slug}-{chapter}-");

    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Open> = Vec::new();
    let mut chapter_depth: Option<usize> = None;
    let mut content = ChapterContent::default();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| ContentError::Markup {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let role = classify(&e, chapter_depth, stack.len(), &wanted_chapter, &verse_prefix);
                if matches!(role, Role::Chapter) {
                    chapter_depth = Some(stack.len());
                }
                stack.push(Open {
                    tag: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    role,
                    content_start: after,
                });
            }
            Event::Empty(e) => {
                match classify(&e, chapter_depth, stack.len(), &wanted_chapter, &verse_prefix) {
                    // a self-closing chapter element is a chapter without verses
                    Role::Chapter => return Ok(Some(content)),
                    Role::Verse { number, id, class } => {
                        content.verses.entry(number).or_insert(VerseFragment {
                            number,
                            id: Some(id),
                            tag: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                            class,
                            html: String::new(),
                        });
                    }
                    Role::Heading | Role::Other => {}
                }
            }
            Event::End(_) => {
                let Some(open) = stack.pop() else {
                    continue;
                };
                let inner = &markup[open.content_start..before];
                match open.role {
                    Role::Chapter => return Ok(Some(content)),
                    Role::Heading => {
                        if content.heading.is_none() {
                            content.heading = Some(plain_text(inner));
                        }
                    }
                    Role::Verse { number, id, class } => {
                        content.verses.entry(number).or_insert(VerseFragment {
                            number,
                            id: Some(id),
                            tag: open.tag,
                            class,
                            html: inner.to_string(),
                        });
                    }
                    Role::Other => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match chapter_depth {
        Some(_) => Err(ContentError::Unterminated(wanted_chapter)),
        None => Ok(None),
    }
}

fn classify(
    e: &BytesStart<'_>,
    chapter_depth: Option<usize>,
    depth: usize,
    wanted_chapter: &str,
    verse_prefix: &str,
) -> Role {
    let mut id = None;
    let mut class = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
            b"class" => class = Some(String::from_utf8_lossy(&attr.value).to_string()),
            _ => {}
        }
    }

    let Some(chapter_depth) = chapter_depth else {
        return match id {
            Some(id) if id == wanted_chapter => Role::Chapter,
            _ => Role::Other,
        };
    };

    let verse_number = id
        .as_deref()
        .and_then(|id| id.strip_prefix(verse_prefix))
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0);
    if let (Some(number), Some(id)) = (verse_number, id) {
        return Role::Verse { number, id, class };
    }

    let is_heading = matches!(
        e.local_name().as_ref(),
        b"h1" | b"h2" | b"h3" | b"h4" | b"h5" | b"h6"
    );
    if is_heading && depth == chapter_depth + 1 {
        Role::Heading
    } else {
        Role::Other
    }
}

/// Strip markup, decode entities and collapse whitespace
#[must_use]
pub fn plain_text(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, "");
    let decoded = quick_xml::escape::unescape(&stripped)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| stripped.to_string());
    SPACES.replace_all(decoded.trim(), " ").into_owned()
}

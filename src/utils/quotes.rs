//! Quotation glyph normalization for extracted verse text.
//!
//! Verse boundaries rarely coincide with quotation boundaries, so a single extracted verse
//! often carries only one half of a quote pair. [`QuoteNormalizer`] balances such text,
//! demotes complete quotations to the inner pair so the verse can itself be quoted, and
//! removes the dangling attribution dash some editions leave at the end of a verse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Anything that is not a letter, number, punctuation, symbol or space separator.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\p{P}\p{S}\p{Zs}]").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("valid regex"));

/// Trailing dash run, optionally followed by one quotation mark which is kept.
static TRAILING_DASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s*[\-\u{2010}-\u{2015}]+\s*(?P<mark>["'«»‹›“”„‘’‚])?\s*$"#)
        .expect("valid regex")
});

/// The outer and inner quotation mark pairs of one typographic convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteStyle {
    pub outer_open: char,
    pub outer_close: char,
    pub inner_open: char,
    pub inner_close: char,
}

impl QuoteStyle {
    /// “double” and ‘single’ curly quotes
    pub const ENGLISH: Self = Self {
        outer_open: '“',
        outer_close: '”',
        inner_open: '‘',
        inner_close: '’',
    };

    /// »Chevrons« pointing inwards, as in German book typography
    pub const GERMAN: Self = Self {
        outer_open: '»',
        outer_close: '«',
        inner_open: '›',
        inner_close: '‹',
    };

    /// «Guillemets» pointing outwards
    pub const GUILLEMETS: Self = Self {
        outer_open: '«',
        outer_close: '»',
        inner_open: '‹',
        inner_close: '›',
    };
}

/// Deterministic quotation filter over a single string.
#[derive(Debug, Clone, Copy)]
pub struct QuoteNormalizer {
    style: QuoteStyle,
}

impl QuoteNormalizer {
    #[must_use]
    pub fn new(style: QuoteStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> QuoteStyle {
        self.style
    }

    /// Clean and balance `text`.
    ///
    /// A lone closing (opening) outer mark gets its partner synthesized at the start
    /// (end). If both outer marks were already present they are rewritten to the inner
    /// pair. An `outer+inner … inner+outer` boundary overlap collapses to single outer
    /// marks. Finally the text is trimmed and a trailing dash run is removed.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let QuoteStyle {
            outer_open,
            outer_close,
            inner_open,
            inner_close,
        } = self.style;

        let spaced = WHITESPACE.replace_all(text, " ");
        let mut out = DISALLOWED.replace_all(&spaced, "").into_owned();

        let has_open = out.contains(outer_open);
        let has_close = out.contains(outer_close);
        match (has_open, has_close) {
            (false, true) => out.insert(0, outer_open),
            (true, false) => out.push(outer_close),
            (true, true) => {
                out = out
                    .chars()
                    .map(|c| match c {
                        c if c == outer_open => inner_open,
                        c if c == outer_close => inner_close,
                        c => c,
                    })
                    .collect();
            }
            (false, false) => {}
        }

        let chars: Vec<char> = out.chars().collect();
        if chars.len() >= 4
            && chars[0] == outer_open
            && chars[1] == inner_open
            && chars[chars.len() - 2] == inner_close
            && chars[chars.len() - 1] == outer_close
        {
            let middle: String = chars[2..chars.len() - 2].iter().collect();
            out = format!("{outer_open}{middle}{outer_close}");
        }

        let trimmed = out.trim();
        TRAILING_DASH
            .replace(trimmed, "$mark")
            .trim()
            .to_string()
    }

    /// [`normalize`](Self::normalize), then wrap the result once in `open`/`close`.
    ///
    /// Text already wrapped in `open`/`close` is returned unchanged; text wrapped in this
    /// style's inner pair has that pair promoted instead of being wrapped again.
    #[must_use]
    pub fn normalize_wrapped(&self, text: &str, open: char, close: char) -> String {
        wrap_once(&self.normalize(text), open, close, &self.style)
    }
}

fn wrap_once(text: &str, open: char, close: char, style: &QuoteStyle) -> String {
    let chars: Vec<char> = text.chars().collect();
    let wrapped_in = |o: char, c: char| {
        chars.len() >= 2 && chars[0] == o && chars[chars.len() - 1] == c
    };

    if wrapped_in(open, close) {
        return text.to_string();
    }
    if wrapped_in(style.inner_open, style.inner_close) {
        let middle: String = chars[1..chars.len() - 1].iter().collect();
        return format!("{open}{middle}{close}");
    }
    format!("{open}{text}{close}")
}

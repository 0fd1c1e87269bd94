use std::path::Path;

use thiserror::Error;

use crate::core::book::BookEntry;
use crate::utils::validation::{check_book_limit, validate_locator};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many books: {0}")]
    TooManyBooks(usize),
}

/// Parse a dataset catalog file with columns: order, short_name, display_name, locator
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_books_file(path: &Path) -> Result<Vec<BookEntry>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_books_text(&content)
}

/// Parse catalog text with columns: order, short_name, display_name, locator
///
/// The display name column may be empty. Rows are returned in file order; the caller
/// decides how to order and deduplicate them.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if lines have fewer than 4 fields, an invalid
/// order, an empty short name or an unsafe locator, or `ParseError::TooManyBooks` if
/// the limit is exceeded.
pub fn parse_books_text(text: &str) -> Result<Vec<BookEntry>, ParseError> {
    let mut books = Vec::new();

    for (line_num, fields) in data_rows(text, &["order"]) {
        if fields.len() < 4 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 4 fields"
            )));
        }

        let order: u32 = fields[0].trim().parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid order on line {}: '{}'",
                line_num, fields[0]
            ))
        })?;
        if order == 0 {
            return Err(ParseError::InvalidFormat(format!(
                "Order must start at 1 (line {line_num})"
            )));
        }

        let short_name = fields[1].trim();
        if short_name.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Empty short name on line {line_num}"
            )));
        }

        let locator = validate_locator(fields[3]).map_err(|e| {
            ParseError::InvalidFormat(format!("Line {line_num}: {e}"))
        })?;

        let mut book = BookEntry::new(order, short_name, locator);
        let display_name = fields[2].trim();
        if !display_name.is_empty() {
            book = book.with_display_name(display_name);
        }

        // Check book limit for DOS protection
        if check_book_limit(books.len()).is_some() {
            return Err(ParseError::TooManyBooks(books.len()));
        }

        books.push(book);
    }

    if books.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No books found in catalog".to_string(),
        ));
    }

    Ok(books)
}

/// Parse an abbreviation file: short_name followed by any number of spelling variants
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn parse_abbreviations_file(path: &Path) -> Result<Vec<(String, Vec<String>)>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_abbreviations_text(&content))
}

/// Parse abbreviation text, keeping row and variant order.
///
/// Rows without a short name are skipped; a short name with no variants is kept so
/// the row still documents the book.
#[must_use]
pub fn parse_abbreviations_text(text: &str) -> Vec<(String, Vec<String>)> {
    data_rows(text, &["short_name", "book"])
        .filter_map(|(_, fields)| {
            let (short_name, variants) = fields.split_first()?;
            let short_name = short_name.trim();
            if short_name.is_empty() {
                return None;
            }
            let variants = variants
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            Some((short_name.to_string(), variants))
        })
        .collect()
}

/// Non-comment, non-blank rows split on tabs, skipping a header row whose first
/// field is one of `header_names`. Line numbers are 1-based.
fn data_rows<'a>(
    text: &'a str,
    header_names: &'a [&'a str],
) -> impl Iterator<Item = (usize, Vec<&'a str>)> + 'a {
    let mut first_data_line = true;
    text.lines()
        .enumerate()
        .filter_map(move |(i, line)| {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                return None;
            }
            let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();

            // Check if first non-empty/non-comment line is a header
            if first_data_line {
                first_data_line = false;
                let first = fields.first().map(|s| s.trim().to_lowercase()).unwrap_or_default();
                if header_names.contains(&first.as_str()) {
                    return None;
                }
            }
            Some((i + 1, fields))
        })
}

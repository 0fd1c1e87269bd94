//! Centralized validation and helper functions.

/// Maximum number of books a single dataset catalog may list (DOS protection)
pub const MAX_BOOKS: usize = 1_000;

/// Maximum size of text accepted for citation linking
pub const MAX_LINK_TEXT_SIZE: usize = 1024 * 1024; // 1MB

/// Security-related constants for input validation
pub const MAX_LOCATOR_LENGTH: usize = 255;
pub const MAX_SEGMENT_LENGTH: usize = 128;

/// Security validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Content locator too long: exceeds {MAX_LOCATOR_LENGTH} characters")]
    LocatorTooLong,
    #[error("Invalid content locator: contains path traversal or invalid characters")]
    InvalidLocator,
    #[error("Empty content locator provided")]
    EmptyLocator,
    #[error("Path segment too long: exceeds {MAX_SEGMENT_LENGTH} characters")]
    SegmentTooLong,
    #[error("Text too large: exceeds {MAX_LINK_TEXT_SIZE} bytes")]
    TextTooLarge,
}

/// Check if adding another book would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new book.
#[must_use]
pub fn check_book_limit(count: usize) -> Option<String> {
    if count >= MAX_BOOKS {
        Some(format!(
            "Too many books: adding another would exceed maximum of {MAX_BOOKS}"
        ))
    } else {
        None
    }
}

/// Validate a content locator taken from a dataset catalog.
///
/// Locators are relative paths below the dataset directory. They may contain `/` to
/// address subdirectories, but never absolute roots, `..` components, backslashes,
/// or control characters.
///
/// # Errors
///
/// Returns `ValidationError::EmptyLocator` if the locator is blank,
/// `ValidationError::LocatorTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidLocator` if it could escape the dataset directory.
///
/// # Examples
///
/// ```
/// use interlinear::utils::validation::validate_locator;
///
/// assert!(validate_locator("nt/john.xhtml").is_ok());
/// assert!(validate_locator("../secrets.txt").is_err());
/// ```
pub fn validate_locator(locator: &str) -> Result<&str, ValidationError> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(ValidationError::EmptyLocator);
    }

    if locator.len() > MAX_LOCATOR_LENGTH {
        return Err(ValidationError::LocatorTooLong);
    }

    if locator.starts_with('/') || locator.contains('\\') || locator.contains(':') {
        return Err(ValidationError::InvalidLocator);
    }

    // Check for null bytes and other dangerous characters
    if locator.chars().any(char::is_control) {
        return Err(ValidationError::InvalidLocator);
    }

    // Prevent directory traversal and hidden files
    if locator
        .split('/')
        .any(|part| part.is_empty() || part.starts_with('.'))
    {
        return Err(ValidationError::InvalidLocator);
    }

    Ok(locator)
}

/// Validate a single raw URL path segment before it is parsed.
///
/// # Errors
///
/// Returns `ValidationError::SegmentTooLong` when the segment exceeds the limit.
pub fn validate_segment(segment: &str) -> Result<&str, ValidationError> {
    if segment.len() > MAX_SEGMENT_LENGTH {
        return Err(ValidationError::SegmentTooLong);
    }
    Ok(segment)
}

/// Validate the size of text submitted for citation linking.
///
/// # Errors
///
/// Returns `ValidationError::TextTooLarge` when the text exceeds the limit.
pub fn validate_link_text(text: &str) -> Result<&str, ValidationError> {
    if text.len() > MAX_LINK_TEXT_SIZE {
        return Err(ValidationError::TextTooLarge);
    }
    Ok(text)
}

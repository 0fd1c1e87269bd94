//! Parsers for the corpus source files.
//!
//! This module provides parsers for:
//!
//! - **Book catalogs** (`books.tsv`): ordered book rows per dataset
//! - **Abbreviation lists** (`abbreviations.tsv`): spelling variants per book
//! - **Book content** (XHTML): chapter sub-documents and verse fragments
//!
//! ## Example
//!
//! ```rust
//! use interlinear::parsing::content::extract_chapter;
//! use interlinear::parsing::tsv::parse_books_text;
//!
//! let books = parse_books_text("43\tJohn\tThe Gospel of John\tjohn.xhtml\n").unwrap();
//! assert_eq!(books[0].slug(), "john");
//!
//! let xhtml = r#"<section id="john-ch-11"><span id="john-11-35">Jesus wept.</span></section>"#;
//! let chapter = extract_chapter(xhtml, "john", 11).unwrap().unwrap();
//! assert_eq!(chapter.verses[&35].plain_text(), "Jesus wept.");
//! ```
//!
//! ## Catalog columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | order | 1-based canonical position | Yes |
//! | short_name | Dataset-specific book name | Yes |
//! | display_name | Longer name, may be empty | No |
//! | locator | Content file relative to the dataset | Yes |

pub mod content;
pub mod tsv;

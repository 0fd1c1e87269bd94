//! Text helpers shared by the catalog, matcher and composer.
//!
//! - [`slug`]: identifier folding used wherever book names are compared
//! - [`quotes`]: quotation mark balancing for extracted verse text
//! - [`validation`]: input limits and content locator checks

pub mod quotes;
pub mod slug;
pub mod validation;

//! Feature modules - optional vocabularies
//!
//! Each feature provides a parsing category and a matching text category
//! that callers layer over the defaults:
//! - Custom quotes (`\putinquotes`, `inquotes`, quote specials)

pub mod quotes;

// Re-export commonly used items
pub use quotes::{add_quotes, quotes_parsing_category, quotes_text_category, QUOTES_CATEGORY};

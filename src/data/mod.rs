//! Data layer - static vocabulary tables
//!
//! This module contains the default LaTeX vocabulary:
//! - Specials tokens and symbol macros
//! - Macro and environment signatures with their text templates
//! - The default parsing and text databases built from them

pub mod defaults;
pub mod macros;
pub mod symbols;

// Re-export commonly used items
pub use defaults::{default_latex_context, default_text_context, latex_context, text_context};
pub use macros::TextEntry;
pub use symbols::{SPECIALS, SYMBOL_MACROS};

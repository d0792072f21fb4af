//! Core modules
//!
//! - `context`: ordered, categorized lookup databases
//! - `walker`: registry-driven LaTeX parser producing a node tree
//! - `latex2text`: node tree to plain text converter

pub mod context;
pub mod latex2text;
pub mod walker;

// Re-export main types and functions
pub use context::{Category, ContextDb, ContextEntry, Placement, SpecKind};
pub use latex2text::rule::{ReplacementRule, SubConvert, Template, TextSpec};
pub use latex2text::{convert, LatexNodes2Text, TextDb, TextOptions};
pub use walker::nodes::{dump_tree, ArgSlot, Delimiter, Node, NodeList, Span};
pub use walker::spec::{ArgKind, ArgSignature, Specification};
pub use walker::{parse, ParseOptions, ParsingDb, Walker};

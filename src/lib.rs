//! # texwalk
//!
//! Registry-driven LaTeX walker and plain-text converter written in Rust.
//!
//! ## Features
//!
//! - **No fixed grammar**: argument shapes come from a context database of
//!   specifications, so new macros, environments and specials are a
//!   registration away
//! - **Layered vocabularies**: databases hold ordered categories and the
//!   earliest category wins, so custom entries mask the defaults
//! - **Template or callback rules**: text rules substitute placeholders or
//!   run a closure that can convert sub-trees itself
//! - **Graceful degradation**: unknown names become text and are reported
//!   as warnings instead of errors
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Default vocabulary
//!
//! ```rust
//! use texwalk::latex_to_text;
//!
//! let text = latex_to_text(r"\section{Intro} Some \emph{text} -- done.").unwrap();
//! assert!(text.contains("§ Intro"));
//! assert!(text.contains("Some text – done."));
//! ```
//!
//! ### Custom vocabulary
//!
//! ```rust
//! use texwalk::core::{Category, Placement, Specification, TextSpec};
//! use texwalk::{default_latex_context, default_text_context, latex_to_text_with};
//!
//! let mut latex = default_latex_context();
//! latex.add_category(
//!     Category::new("mine").with_entries([Specification::macro_spec("shout", "{").unwrap()]),
//!     Placement::Prepend,
//! ).unwrap();
//!
//! let mut text = default_text_context();
//! text.add_category(
//!     Category::new("mine").with_entries([TextSpec::macro_template("shout", "{1}!").unwrap()]),
//!     Placement::Prepend,
//! ).unwrap();
//!
//! assert_eq!(latex_to_text_with(r"\shout{hey}", &latex, &text).unwrap(), "hey!");
//! ```

/// Core modules: context databases, walker, converter
pub mod core;

/// Data layer - default vocabulary tables
pub mod data;

/// Feature modules - optional vocabularies
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core types and functions
pub use crate::core::latex2text::{convert, LatexNodes2Text, TextDb, TextOptions};
pub use crate::core::walker::nodes::{dump_tree, Node};
pub use crate::core::walker::{parse, ParseOptions, ParsingDb, Walker};

// Re-export default databases
pub use data::{default_latex_context, default_text_context};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{
    ConfigError, ConversionOutput, ConversionWarning, ParseError, ParseErrorKind, ParseResult,
};

/// Convert LaTeX to plain text with the default vocabulary
///
/// # Arguments
/// * `input` - LaTeX source
///
/// # Returns
/// The text, or the error that stopped the walker
pub fn latex_to_text(input: &str) -> ParseResult<String> {
    latex_to_text_with(input, data::latex_context(), data::text_context())
}

/// Convert LaTeX to plain text with caller-supplied databases
pub fn latex_to_text_with(input: &str, latex: &ParsingDb, text: &TextDb) -> ParseResult<String> {
    let (nodes, _) = parse(input, latex)?;
    Ok(convert(&nodes, text))
}

/// Convert LaTeX to plain text, collecting warnings from both stages
///
/// A name the walker already reported as unknown is not reported again as
/// missing a text rule.
pub fn latex_to_text_output(
    input: &str,
    latex: &ParsingDb,
    text: &TextDb,
    options: &TextOptions,
) -> ParseResult<ConversionOutput> {
    let mut walker = Walker::new(input, latex);
    let (nodes, _) = walker.parse()?;
    let mut warnings = walker.into_warnings();

    let output = LatexNodes2Text::with_options(text, options.clone()).convert_output(&nodes);
    for warning in output.warnings {
        let reported = match &warning {
            ConversionWarning::MissingRule { kind, name } => warnings.iter().any(|w| match w {
                ConversionWarning::UnknownMacro { name: n, .. } => {
                    *kind == crate::core::SpecKind::Macro && n == name
                }
                ConversionWarning::UnknownEnvironment { name: n, .. } => {
                    *kind == crate::core::SpecKind::Environment && n == name
                }
                _ => false,
            }),
            _ => false,
        };
        if !reported {
            warnings.push(warning);
        }
    }

    Ok(ConversionOutput::with_warnings(output.content, warnings))
}

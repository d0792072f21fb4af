//! Custom quotes vocabulary
//!
//! Adds `\putindblquotes{text}`, `\putinquotes[open][close]{text}` and the
//! `indblquotes` / `inquotes` environments, plus the `` ` `` `'` ``` `` ```
//! `''` specials rendered as typographic quotes. Missing optional quote
//! arguments default to `“` and `”`.
//!
//! ```
//! use texwalk::data::{default_latex_context, default_text_context};
//! use texwalk::features::quotes::add_quotes;
//! use texwalk::latex_to_text_with;
//!
//! let mut latex = default_latex_context();
//! let mut text = default_text_context();
//! add_quotes(&mut latex, &mut text).unwrap();
//!
//! let out = latex_to_text_with(r"\putinquotes[`][']{Hello, world}", &latex, &text).unwrap();
//! assert_eq!(out, "‘Hello, world’");
//! ```

use crate::core::context::{Category, Placement};
use crate::core::latex2text::rule::{ReplacementRule, SubConvert, TextSpec};
use crate::core::latex2text::TextDb;
use crate::core::walker::nodes::Node;
use crate::core::walker::spec::Specification;
use crate::core::walker::ParsingDb;
use crate::utils::error::ConfigError;

/// Name of the quotes category in both databases
pub const QUOTES_CATEGORY: &str = "quotes";

const DEFAULT_OPEN: &str = "“";
const DEFAULT_CLOSE: &str = "”";

/// Parsing side of the vocabulary
pub fn quotes_parsing_category() -> Result<Category<Specification>, ConfigError> {
    Ok(Category::new(QUOTES_CATEGORY).with_entries([
        Specification::macro_spec("putindblquotes", "{")?,
        Specification::macro_spec("putinquotes", "[[{")?,
        Specification::environment_spec("indblquotes", "")?,
        Specification::environment_spec("inquotes", "[[")?,
        Specification::specials_spec("`")?,
        Specification::specials_spec("'")?,
        Specification::specials_spec("``")?,
        Specification::specials_spec("''")?,
    ]))
}

/// Text side of the vocabulary
pub fn quotes_text_category() -> Result<Category<TextSpec>, ConfigError> {
    Ok(Category::new(QUOTES_CATEGORY).with_entries([
        TextSpec::macro_template("putindblquotes", "“{1}”")?,
        TextSpec::macro_text("putinquotes", ReplacementRule::callback(put_in_quotes))?,
        TextSpec::environment_template("indblquotes", "“{body}”")?,
        TextSpec::environment_text("inquotes", ReplacementRule::callback(in_quotes))?,
        TextSpec::specials_replacement("`", "‘")?,
        TextSpec::specials_replacement("'", "’")?,
        TextSpec::specials_replacement("``", "“")?,
        TextSpec::specials_replacement("''", "”")?,
    ]))
}

/// Prepend the quotes category to both databases
pub fn add_quotes(latex: &mut ParsingDb, text: &mut TextDb) -> Result<(), ConfigError> {
    latex.add_category(quotes_parsing_category()?, Placement::Prepend)?;
    text.add_category(quotes_text_category()?, Placement::Prepend)?;
    Ok(())
}

/// `\putinquotes[open][close]{text}`
fn put_in_quotes(node: &Node, conv: &dyn SubConvert) -> String {
    // A bare \putinquotes token, e.g. read under a fallback specification
    if node.args().len() < 3 {
        return String::new();
    }
    let open = conv.arg_text_or(node, 0, DEFAULT_OPEN);
    let close = conv.arg_text_or(node, 1, DEFAULT_CLOSE);
    format!("{}{}{}", open, conv.arg_text_or(node, 2, ""), close)
}

/// `\begin{inquotes}[open][close] ... \end{inquotes}`
fn in_quotes(node: &Node, conv: &dyn SubConvert) -> String {
    let open = conv.arg_text_or(node, 0, DEFAULT_OPEN);
    let close = conv.arg_text_or(node, 1, DEFAULT_CLOSE);
    format!("{}{}{}", open, conv.nodes_to_text(node.body()), close)
}

//! Default parsing and text databases
//!
//! Both databases hold the same categories, in this order:
//! `latex-base`, `latex-formatting`, `latex-sectioning`, `latex-lists`,
//! `latex-specials`, `latex-symbols`. Macros and environments missing from
//! the parsing database are read with an empty signature, so an unknown
//! `\foo{x}` leaves `x` in the text.

use lazy_static::lazy_static;

use crate::core::context::{Category, Placement, SpecKind};
use crate::core::latex2text::rule::{ReplacementRule, SubConvert, TextSpec};
use crate::core::latex2text::TextDb;
use crate::core::walker::nodes::Node;
use crate::core::walker::spec::Specification;
use crate::core::walker::ParsingDb;
use crate::utils::error::ConfigError;

use super::macros::{
    TextEntry, BASE_ENVIRONMENTS, BASE_MACROS, FORMATTING_MACROS, LIST_ENVIRONMENTS,
    SECTIONING_MACROS,
};
use super::symbols::{SPECIALS, SYMBOL_MACROS};

pub const BASE_CATEGORY: &str = "latex-base";
pub const FORMATTING_CATEGORY: &str = "latex-formatting";
pub const SECTIONING_CATEGORY: &str = "latex-sectioning";
pub const LISTS_CATEGORY: &str = "latex-lists";
pub const SPECIALS_CATEGORY: &str = "latex-specials";
pub const SYMBOLS_CATEGORY: &str = "latex-symbols";

type Table = phf::Map<&'static str, TextEntry>;

/// Macro and environment tables of one category
struct CategoryTables {
    name: &'static str,
    macros: &'static [&'static Table],
    environments: &'static [&'static Table],
}

const TABLE_CATEGORIES: [CategoryTables; 4] = [
    CategoryTables {
        name: BASE_CATEGORY,
        macros: &[&BASE_MACROS],
        environments: &[&BASE_ENVIRONMENTS],
    },
    CategoryTables {
        name: FORMATTING_CATEGORY,
        macros: &[&FORMATTING_MACROS],
        environments: &[],
    },
    CategoryTables {
        name: SECTIONING_CATEGORY,
        macros: &[&SECTIONING_MACROS],
        environments: &[],
    },
    CategoryTables {
        name: LISTS_CATEGORY,
        macros: &[],
        environments: &[&LIST_ENVIRONMENTS],
    },
];

lazy_static! {
    static ref DEFAULT_LATEX_CONTEXT: ParsingDb =
        build_latex_context().expect("default parsing tables are valid");
    static ref DEFAULT_TEXT_CONTEXT: TextDb =
        build_text_context().expect("default text tables are valid");
}

/// A fresh copy of the default parsing database
pub fn default_latex_context() -> ParsingDb {
    DEFAULT_LATEX_CONTEXT.clone()
}

/// A fresh copy of the default text database
pub fn default_text_context() -> TextDb {
    DEFAULT_TEXT_CONTEXT.clone()
}

/// Shared default parsing database
pub fn latex_context() -> &'static ParsingDb {
    &DEFAULT_LATEX_CONTEXT
}

/// Shared default text database
pub fn text_context() -> &'static TextDb {
    &DEFAULT_TEXT_CONTEXT
}

fn build_latex_context() -> Result<ParsingDb, ConfigError> {
    let mut db = ParsingDb::new();
    for tables in &TABLE_CATEGORIES {
        let mut category = Category::new(tables.name);
        for (name, entry) in tables.macros.iter().flat_map(|t| t.entries()) {
            category.push(Specification::macro_spec(*name, entry.signature)?);
        }
        for (name, entry) in tables.environments.iter().flat_map(|t| t.entries()) {
            category.push(Specification::environment_spec(*name, entry.signature)?);
        }
        if tables.name == LISTS_CATEGORY {
            category.push(Specification::macro_spec("item", "[")?);
        }
        db.add_category(category, Placement::Append)?;
    }

    let specials = SPECIALS
        .keys()
        .map(|token| Specification::specials_spec(*token))
        .collect::<Result<Vec<_>, _>>()?;
    db.add_category(
        Category::new(SPECIALS_CATEGORY).with_entries(specials),
        Placement::Append,
    )?;

    let symbols = SYMBOL_MACROS
        .keys()
        .map(|name| Specification::macro_spec(*name, ""))
        .collect::<Result<Vec<_>, _>>()?;
    db.add_category(
        Category::new(SYMBOLS_CATEGORY).with_entries(symbols),
        Placement::Append,
    )?;

    db.set_unknown(SpecKind::Macro, Specification::macro_spec("unknown", "")?);
    db.set_unknown(
        SpecKind::Environment,
        Specification::environment_spec("unknown", "")?,
    );
    Ok(db)
}

fn build_text_context() -> Result<TextDb, ConfigError> {
    let mut db = TextDb::new();
    for tables in &TABLE_CATEGORIES {
        let mut category = Category::new(tables.name);
        for (name, entry) in tables.macros.iter().flat_map(|t| t.entries()) {
            category.push(TextSpec::macro_template(*name, entry.template)?);
        }
        for (name, entry) in tables.environments.iter().flat_map(|t| t.entries()) {
            category.push(TextSpec::environment_template(*name, entry.template)?);
        }
        if tables.name == LISTS_CATEGORY {
            category.push(TextSpec::macro_text(
                "item",
                ReplacementRule::callback(item_text),
            )?);
        }
        db.add_category(category, Placement::Append)?;
    }

    let specials = SPECIALS
        .entries()
        .map(|(token, text)| TextSpec::specials_replacement(*token, text))
        .collect::<Result<Vec<_>, _>>()?;
    db.add_category(
        Category::new(SPECIALS_CATEGORY).with_entries(specials),
        Placement::Append,
    )?;

    let symbols = SYMBOL_MACROS
        .entries()
        .map(|(name, text)| TextSpec::macro_text(*name, ReplacementRule::text(text)))
        .collect::<Result<Vec<_>, _>>()?;
    db.add_category(
        Category::new(SYMBOLS_CATEGORY).with_entries(symbols),
        Placement::Append,
    )?;
    Ok(db)
}

/// `\item[label]` starts an indented line with the label, or a bullet
fn item_text(node: &Node, conv: &dyn SubConvert) -> String {
    format!("\n  {}", conv.arg_text_or(node, 0, "*"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        assert!(build_latex_context().is_ok());
        assert!(build_text_context().is_ok());
    }

    #[test]
    fn test_category_order() {
        let expected = [
            BASE_CATEGORY,
            FORMATTING_CATEGORY,
            SECTIONING_CATEGORY,
            LISTS_CATEGORY,
            SPECIALS_CATEGORY,
            SYMBOLS_CATEGORY,
        ];
        assert!(latex_context().category_names().eq(expected));
        assert!(text_context().category_names().eq(expected));
    }

    #[test]
    fn test_every_parsed_name_has_a_rule() {
        let latex = latex_context();
        let text = text_context();
        for name in latex.category_names() {
            let parsing = latex.category(name).unwrap();
            let rules = text.category(name).unwrap();
            assert_eq!(parsing.len(), rules.len(), "category {}", name);
            for spec in parsing.entries() {
                assert!(
                    rules.get(spec.kind(), spec.name()).is_some(),
                    "no rule for {} '{}'",
                    spec.kind(),
                    spec.name()
                );
            }
        }
    }

    #[test]
    fn test_defaults_are_independent_copies() {
        let mut db = default_latex_context();
        db.remove_category(SYMBOLS_CATEGORY);
        assert_eq!(db.len(), 5);
        assert_eq!(latex_context().len(), 6);
    }
}

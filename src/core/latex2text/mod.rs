//! Node tree to plain text
//!
//! [`LatexNodes2Text`] walks a node tree and asks a [`TextDb`] how to render
//! every macro, environment and specials node. Plain characters are copied,
//! groups are flattened and comments are dropped unless requested.

pub mod rule;


use std::cell::RefCell;

use crate::core::context::{ContextDb, SpecKind};
use crate::core::walker::nodes::{ArgSlot, Delimiter, Node};
use crate::utils::error::{ConversionOutput, ConversionWarning};

use rule::{SubConvert, TextSpec};

/// Context database used by the converter
pub type TextDb = ContextDb<TextSpec>;

/// Options for node to text conversion
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Emit comments as `%text` followed by a newline
    /// Default: false
    pub keep_comments: bool,

    /// Keep the `{` `}` of brace groups that are not arguments
    /// Default: false
    pub keep_braced_groups: bool,
}

impl TextOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comments and group braces, for inspecting what the source held
    pub fn verbatim() -> Self {
        Self {
            keep_comments: true,
            keep_braced_groups: true,
        }
    }
}

/// Converts node trees to text against one text database
pub struct LatexNodes2Text<'a> {
    db: &'a TextDb,
    options: TextOptions,
    warnings: RefCell<Vec<ConversionWarning>>,
}

impl<'a> LatexNodes2Text<'a> {
    pub fn new(db: &'a TextDb) -> Self {
        Self::with_options(db, TextOptions::default())
    }

    pub fn with_options(db: &'a TextDb, options: TextOptions) -> Self {
        Self {
            db,
            options,
            warnings: RefCell::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    /// Convert and hand back the warnings gathered so far
    pub fn convert_output(&self, nodes: &[Node]) -> ConversionOutput {
        let content = self.nodes_to_text(nodes);
        ConversionOutput::with_warnings(content, self.warnings.take())
    }

    /// Missing rules met so far, each `(kind, name)` once
    pub fn warnings(&self) -> Vec<ConversionWarning> {
        self.warnings.borrow().clone()
    }

    fn convert_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Chars(chars) => out.push_str(&chars.text),
            Node::Comment(comment) => {
                if self.options.keep_comments {
                    out.push('%');
                    out.push_str(&comment.text);
                    out.push('\n');
                }
            }
            Node::Group(group) => {
                let braces =
                    self.options.keep_braced_groups && group.delimiter == Delimiter::Brace;
                if braces {
                    out.push('{');
                }
                self.convert_list(&group.body, out);
                if braces {
                    out.push('}');
                }
            }
            Node::Macro(_) | Node::Environment(_) | Node::Specials(_) => {
                self.convert_entry(node, out)
            }
        }
    }

    fn convert_list(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            self.convert_node(node, out);
        }
    }

    fn convert_entry(&self, node: &Node, out: &mut String) {
        let (Some(kind), Some(name)) = (node.spec_kind(), node.name()) else {
            return;
        };
        if let Some(spec) = self.db.lookup_or_unknown(kind, name) {
            out.push_str(&spec.rule().apply(node, self));
            return;
        }

        self.missing_rule(kind, name);
        for slot in node.args() {
            if let ArgSlot::Present(arg) = slot {
                out.push_str(&self.arg_to_text(arg));
            }
        }
        self.convert_list(node.body(), out);
    }

    fn missing_rule(&self, kind: SpecKind, name: &str) {
        let mut warnings = self.warnings.borrow_mut();
        let seen = warnings.iter().any(|w| match w {
            ConversionWarning::MissingRule { kind: k, name: n } => *k == kind && n == name,
            _ => false,
        });
        if !seen {
            log::debug!("no text rule for {} '{}'", kind, name);
            warnings.push(ConversionWarning::MissingRule {
                kind,
                name: name.to_string(),
            });
        }
    }
}

impl SubConvert for LatexNodes2Text<'_> {
    fn nodes_to_text(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        self.convert_list(nodes, &mut out);
        out
    }

    fn node_to_text(&self, node: &Node) -> String {
        let mut out = String::new();
        self.convert_node(node, &mut out);
        out
    }
}

/// Convert `nodes` against `db` with default options
pub fn convert(nodes: &[Node], db: &TextDb) -> String {
    LatexNodes2Text::new(db).nodes_to_text(nodes)
}

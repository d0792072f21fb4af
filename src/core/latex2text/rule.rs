//! Replacement rules for the text converter
//!
//! A rule is either a [`Template`] with placeholders or a callback. Templates
//! understand:
//!
//! - `{1}`, `{2}`, ... argument slots, 1-based like `#1` in TeX
//! - `{body}` the body of an environment
//! - `{name}` the macro/environment name or the specials token
//! - `{{` and `}}` literal braces

use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::context::{ContextEntry, SpecKind};
use crate::core::walker::nodes::{ArgSlot, Node};
use crate::utils::error::ConfigError;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap();
}

/// The part of the converter a callback is allowed to use
pub trait SubConvert {
    /// Convert a node list to text
    fn nodes_to_text(&self, nodes: &[Node]) -> String;

    fn node_to_text(&self, node: &Node) -> String {
        self.nodes_to_text(std::slice::from_ref(node))
    }

    /// Text of an argument node, without the delimiters of its group
    fn arg_to_text(&self, arg: &Node) -> String {
        match arg {
            Node::Group(group) => self.nodes_to_text(&group.body),
            other => self.node_to_text(other),
        }
    }

    /// Text of argument `index` (0-based) of `node`, or `default` when the
    /// slot is absent or the node has no such slot
    fn arg_text_or(&self, node: &Node, index: usize, default: &str) -> String {
        match node.args().get(index) {
            Some(ArgSlot::Present(arg)) => self.arg_to_text(arg),
            _ => default.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Arg(usize),
    Body,
    Name,
}

/// A validated replacement template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
    defaults: FxHashMap<usize, String>,
}

impl Template {
    pub fn new(template: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedTemplate {
            template: template.to_string(),
            reason,
        };

        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            text.push_str(&template[last..whole.start()]);
            last = whole.end();

            match whole.as_str() {
                "{{" => text.push('{'),
                "}}" => text.push('}'),
                "{" | "}" => {
                    return Err(malformed(format!(
                        "unbalanced '{}' at {}",
                        whole.as_str(),
                        whole.start()
                    )))
                }
                _ => {
                    let inner = caps.get(1).map_or("", |m| m.as_str()).trim();
                    let piece = match inner {
                        "body" => Piece::Body,
                        "name" => Piece::Name,
                        _ => match inner.parse::<usize>() {
                            Ok(slot) if slot > 0 => Piece::Arg(slot),
                            _ => {
                                return Err(malformed(format!(
                                    "unknown placeholder '{{{}}}'",
                                    inner
                                )))
                            }
                        },
                    };
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(piece);
                }
            }
        }
        text.push_str(&template[last..]);
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
            defaults: FxHashMap::default(),
        })
    }

    /// A template that always renders `text`
    pub fn literal(text: &str) -> Self {
        Self {
            source: text.replace('{', "{{").replace('}', "}}"),
            pieces: vec![Piece::Text(text.to_string())],
            defaults: FxHashMap::default(),
        }
    }

    /// Text used for argument `slot` (1-based) when it is absent
    pub fn with_default(mut self, slot: usize, text: impl Into<String>) -> Self {
        self.defaults.insert(slot, text.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn render(&self, node: &Node, conv: &dyn SubConvert) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Arg(slot) => match node.args().get(slot - 1) {
                    Some(ArgSlot::Present(arg)) => out.push_str(&conv.arg_to_text(arg)),
                    _ => {
                        if let Some(default) = self.defaults.get(slot) {
                            out.push_str(default);
                        }
                    }
                },
                Piece::Body => {
                    if let Node::Environment(env) = node {
                        out.push_str(&conv.nodes_to_text(&env.body));
                    }
                }
                Piece::Name => out.push_str(node.name().unwrap_or_default()),
            }
        }
        out
    }
}

/// Callback signature for [`ReplacementRule::Callback`]
pub type ReplacementFn = dyn Fn(&Node, &dyn SubConvert) -> String + Send + Sync;

/// How a node becomes text
#[derive(Clone)]
pub enum ReplacementRule {
    Static(Template),
    Callback(Arc<ReplacementFn>),
}

impl ReplacementRule {
    pub fn template(template: &str) -> Result<Self, ConfigError> {
        Template::new(template).map(ReplacementRule::Static)
    }

    /// Always render `text`, ignoring arguments
    pub fn text(text: &str) -> Self {
        ReplacementRule::Static(Template::literal(text))
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Node, &dyn SubConvert) -> String + Send + Sync + 'static,
    {
        ReplacementRule::Callback(Arc::new(f))
    }

    pub fn apply(&self, node: &Node, conv: &dyn SubConvert) -> String {
        match self {
            ReplacementRule::Static(template) => template.render(node, conv),
            ReplacementRule::Callback(f) => f(node, conv),
        }
    }
}

impl fmt::Debug for ReplacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementRule::Static(template) => {
                f.debug_tuple("Static").field(&template.as_str()).finish()
            }
            ReplacementRule::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<Template> for ReplacementRule {
    fn from(template: Template) -> Self {
        ReplacementRule::Static(template)
    }
}

/// Text database entry
#[derive(Debug, Clone)]
pub struct TextSpec {
    kind: SpecKind,
    name: String,
    rule: ReplacementRule,
}

impl TextSpec {
    pub fn new(
        kind: SpecKind,
        name: impl Into<String>,
        rule: impl Into<ReplacementRule>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyName(kind));
        }
        Ok(Self {
            kind,
            name,
            rule: rule.into(),
        })
    }

    pub fn macro_text(
        name: impl Into<String>,
        rule: impl Into<ReplacementRule>,
    ) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Macro, name, rule)
    }

    pub fn environment_text(
        name: impl Into<String>,
        rule: impl Into<ReplacementRule>,
    ) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Environment, name, rule)
    }

    pub fn specials_text(
        token: impl Into<String>,
        rule: impl Into<ReplacementRule>,
    ) -> Result<Self, ConfigError> {
        Self::new(SpecKind::Specials, token, rule)
    }

    /// Macro rendered through a template string
    pub fn macro_template(name: impl Into<String>, template: &str) -> Result<Self, ConfigError> {
        Self::macro_text(name, ReplacementRule::template(template)?)
    }

    /// Environment rendered through a template string
    pub fn environment_template(
        name: impl Into<String>,
        template: &str,
    ) -> Result<Self, ConfigError> {
        Self::environment_text(name, ReplacementRule::template(template)?)
    }

    /// Specials token replaced by fixed text
    pub fn specials_replacement(
        token: impl Into<String>,
        text: &str,
    ) -> Result<Self, ConfigError> {
        Self::specials_text(token, ReplacementRule::text(text))
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &ReplacementRule {
        &self.rule
    }
}

impl ContextEntry for TextSpec {
    fn kind(&self) -> SpecKind {
        self.kind
    }

    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walker::nodes::{CharsNode, EnvironmentNode, MacroNode, Span};

    /// Renders chars verbatim, everything else as `?`
    struct Flat;

    impl SubConvert for Flat {
        fn nodes_to_text(&self, nodes: &[Node]) -> String {
            nodes
                .iter()
                .map(|n| match n {
                    Node::Chars(c) => c.text.clone(),
                    _ => "?".to_string(),
                })
                .collect()
        }
    }

    fn chars(text: &str) -> Node {
        Node::Chars(CharsNode {
            text: text.to_string(),
            span: Span::default(),
        })
    }

    fn macro_node(name: &str, args: Vec<ArgSlot>) -> Node {
        Node::Macro(MacroNode {
            name: name.to_string(),
            args,
            span: Span::default(),
        })
    }

    #[test]
    fn test_template_substitution() {
        let template = Template::new("“{1}” ({name})").unwrap();
        let node = macro_node("q", vec![ArgSlot::Present(chars("hi"))]);
        assert_eq!(template.render(&node, &Flat), "“hi” (q)");
    }

    #[test]
    fn test_template_absent_slot_uses_default() {
        let template = Template::new("{1}{3}{2}")
            .unwrap()
            .with_default(1, "“")
            .with_default(2, "”");
        let node = macro_node(
            "putinquotes",
            vec![
                ArgSlot::Absent,
                ArgSlot::Absent,
                ArgSlot::Present(chars("text")),
            ],
        );
        assert_eq!(template.render(&node, &Flat), "“text”");
    }

    #[test]
    fn test_template_absent_slot_without_default_is_empty() {
        let template = Template::new("[{1}]").unwrap();
        let node = macro_node("x", vec![ArgSlot::Absent]);
        assert_eq!(template.render(&node, &Flat), "[]");
        let bare = macro_node("x", vec![]);
        assert_eq!(template.render(&bare, &Flat), "[]");
    }

    #[test]
    fn test_template_body() {
        let template = Template::new("<{body}>").unwrap();
        let node = Node::Environment(EnvironmentNode {
            name: "quote".to_string(),
            args: vec![],
            body: vec![chars("a"), chars("b")],
            span: Span::default(),
        });
        assert_eq!(template.render(&node, &Flat), "<ab>");
    }

    #[test]
    fn test_template_escapes() {
        let template = Template::new("{{{1}}}").unwrap();
        let node = macro_node("x", vec![ArgSlot::Present(chars("v"))]);
        assert_eq!(template.render(&node, &Flat), "{v}");
    }

    #[test]
    fn test_malformed_templates() {
        for bad in ["{0}", "{foo}", "a}b", "{1", "{-1}"] {
            assert!(
                matches!(
                    Template::new(bad),
                    Err(ConfigError::MalformedTemplate { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_literal_template() {
        let template = Template::literal("{x}");
        assert_eq!(template.render(&macro_node("x", vec![]), &Flat), "{x}");
        assert_eq!(Template::new(template.as_str()).unwrap().pieces, template.pieces);
    }

    #[test]
    fn test_callback_rule() {
        let rule = ReplacementRule::callback(|node, conv| {
            format!("<{}>", conv.arg_text_or(node, 0, "default"))
        });
        assert_eq!(rule.apply(&macro_node("x", vec![ArgSlot::Absent]), &Flat), "<default>");
        assert_eq!(
            rule.apply(&macro_node("x", vec![ArgSlot::Present(chars("v"))]), &Flat),
            "<v>"
        );
        assert_eq!(format!("{:?}", rule), "Callback(..)");
    }

    #[test]
    fn test_text_spec_rejects_empty_name() {
        assert_eq!(
            TextSpec::specials_replacement("", "x").unwrap_err(),
            ConfigError::EmptyName(SpecKind::Specials)
        );
    }
}

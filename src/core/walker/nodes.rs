//! Node tree produced by the walker
//!
//! Every node owns its children and records the byte range of the source it
//! was read from.

use std::fmt::{self, Write};

use crate::core::context::SpecKind;

/// Byte range of a node in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }
}

/// Delimiters of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Delimiter {
    /// `{...}`
    Brace,
    /// `[...]`, only read as an optional argument
    Bracket,
}

impl Delimiter {
    pub fn open(self) -> char {
        match self {
            Delimiter::Brace => '{',
            Delimiter::Bracket => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            Delimiter::Brace => '}',
            Delimiter::Bracket => ']',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Brace => write!(f, "brace"),
            Delimiter::Bracket => write!(f, "bracket"),
        }
    }
}

/// One resolved slot of an argument signature
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArgSlot {
    Present(Node),
    /// An optional slot that was not supplied
    Absent,
}

impl ArgSlot {
    pub fn node(&self) -> Option<&Node> {
        match self {
            ArgSlot::Present(node) => Some(node),
            ArgSlot::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ArgSlot::Present(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CharsNode {
    pub text: String,
    pub span: Span,
}

/// `% ...` up to the end of the line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommentNode {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupNode {
    pub delimiter: Delimiter,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacroNode {
    pub name: String,
    pub args: Vec<ArgSlot>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnvironmentNode {
    pub name: String,
    pub args: Vec<ArgSlot>,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpecialsNode {
    pub token: String,
    pub args: Vec<ArgSlot>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Node {
    Chars(CharsNode),
    Comment(CommentNode),
    Group(GroupNode),
    Macro(MacroNode),
    Environment(EnvironmentNode),
    Specials(SpecialsNode),
}

pub type NodeList = Vec<Node>;

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Chars(n) => n.span,
            Node::Comment(n) => n.span,
            Node::Group(n) => n.span,
            Node::Macro(n) => n.span,
            Node::Environment(n) => n.span,
            Node::Specials(n) => n.span,
        }
    }

    /// Database kind for nodes that are looked up by name
    pub fn spec_kind(&self) -> Option<SpecKind> {
        match self {
            Node::Macro(_) => Some(SpecKind::Macro),
            Node::Environment(_) => Some(SpecKind::Environment),
            Node::Specials(_) => Some(SpecKind::Specials),
            _ => None,
        }
    }

    /// Macro/environment name or specials token
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Macro(n) => Some(&n.name),
            Node::Environment(n) => Some(&n.name),
            Node::Specials(n) => Some(&n.token),
            _ => None,
        }
    }

    /// Argument slots; empty for nodes that take none
    pub fn args(&self) -> &[ArgSlot] {
        match self {
            Node::Macro(n) => &n.args,
            Node::Environment(n) => &n.args,
            Node::Specials(n) => &n.args,
            _ => &[],
        }
    }

    /// Group contents or environment body
    pub fn body(&self) -> &[Node] {
        match self {
            Node::Group(n) => &n.body,
            Node::Environment(n) => &n.body,
            _ => &[],
        }
    }

    /// The node of argument `index` (0-based) if it was supplied
    pub fn arg(&self, index: usize) -> Option<&Node> {
        self.args().get(index).and_then(ArgSlot::node)
    }

    pub fn as_chars(&self) -> Option<&str> {
        match self {
            Node::Chars(n) => Some(&n.text),
            _ => None,
        }
    }
}

/// Indented one-node-per-line rendering, used for debugging output
pub fn dump_tree(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        dump_node(node, 0, &mut out);
    }
    out
}

fn dump_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let span = node.span();
    let label = match node {
        Node::Chars(n) => format!("Chars {:?}", n.text),
        Node::Comment(n) => format!("Comment {:?}", n.text),
        Node::Group(n) => format!("Group {}", n.delimiter),
        Node::Macro(n) => format!("Macro \\{}", n.name),
        Node::Environment(n) => format!("Environment {}", n.name),
        Node::Specials(n) => format!("Specials {:?}", n.token),
    };
    let _ = writeln!(out, "{}{} @{}+{}", indent, label, span.start, span.len);
    for (i, slot) in node.args().iter().enumerate() {
        match slot {
            ArgSlot::Present(arg) => {
                let _ = writeln!(out, "{}  arg {}:", indent, i + 1);
                dump_node(arg, depth + 2, out);
            }
            ArgSlot::Absent => {
                let _ = writeln!(out, "{}  arg {}: absent", indent, i + 1);
            }
        }
    }
    for child in node.body() {
        dump_node(child, depth + 1, out);
    }
}

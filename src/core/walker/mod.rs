//! Registry-driven LaTeX walker
//!
//! The walker reads source text left to right. At every `\name`,
//! `\begin{name}` or registered specials token it asks the parsing
//! [`ContextDb`] for a [`Specification`], and the specification's argument
//! signature decides how many groups are consumed after the token. There is
//! no fixed grammar beyond braces, comments and the environment markers.
//!
//! ```
//! use texwalk::core::context::{Category, Placement};
//! use texwalk::core::walker::{parse, spec::Specification, ParsingDb};
//! use texwalk::core::walker::nodes::Node;
//!
//! let mut db = ParsingDb::new();
//! let quotes = Specification::macro_spec("putinquotes", "[[{").unwrap();
//! db.add_category(Category::new("quotes").with_entries([quotes]), Placement::Prepend)
//!     .unwrap();
//!
//! let (nodes, consumed) = parse(r"\putinquotes{Hello}", &db).unwrap();
//! assert_eq!(consumed, 19);
//! assert!(matches!(&nodes[0], Node::Macro(m) if m.args.len() == 3));
//! ```

pub mod nodes;
pub mod spec;

#[cfg(test)]
mod tests;

use crate::core::context::{ContextDb, SpecKind};
use crate::utils::error::{ConversionWarning, ParseError, ParseErrorKind, ParseResult};

use nodes::{
    ArgSlot, CharsNode, CommentNode, Delimiter, EnvironmentNode, GroupNode, MacroNode, Node,
    SpecialsNode, Span,
};
use spec::{ArgKind, ArgSignature, Specification};

/// Context database used by the walker
pub type ParsingDb = ContextDb<Specification>;

/// Default maximum nesting of groups and environments.
const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for the walker
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum nesting of groups, optional arguments and environments
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What ends the node list currently being read
#[derive(Debug, Clone, Copy)]
enum Terminator<'s> {
    EndOfInput,
    Group { delimiter: Delimiter, open: usize },
    Environment { name: &'s str, open: usize },
}

/// A finished node list. `closer` is where its terminator starts, `end` is
/// just past it.
struct ListEnd {
    nodes: Vec<Node>,
    closer: usize,
    end: usize,
}

enum Step {
    Continue(usize),
    Close { closer: usize, end: usize },
}

/// Walks one source string against a parsing database
pub struct Walker<'a> {
    source: &'a str,
    db: &'a ParsingDb,
    options: ParseOptions,
    warnings: Vec<ConversionWarning>,
}

impl<'a> Walker<'a> {
    pub fn new(source: &'a str, db: &'a ParsingDb) -> Self {
        Self::with_options(source, db, ParseOptions::default())
    }

    pub fn with_options(source: &'a str, db: &'a ParsingDb, options: ParseOptions) -> Self {
        Self {
            source,
            db,
            options,
            warnings: Vec::new(),
        }
    }

    /// Parse the whole source. Returns the nodes and the consumed length.
    pub fn parse(&mut self) -> ParseResult<(Vec<Node>, usize)> {
        self.parse_from(0)
    }

    /// Parse from byte offset `pos` to the end of the source.
    ///
    /// The returned length counts bytes from `pos`.
    pub fn parse_from(&mut self, pos: usize) -> ParseResult<(Vec<Node>, usize)> {
        self.check_position(pos)?;
        let list = self.parse_list(pos, Terminator::EndOfInput, 0)?;
        Ok((list.nodes, list.end - pos))
    }

    /// Parse the brace group starting at `pos`, if there is one.
    ///
    /// Returns the group node and its length in bytes.
    pub fn parse_group_at(&mut self, pos: usize) -> ParseResult<Option<(Node, usize)>> {
        self.check_position(pos)?;
        if !self.source[pos..].starts_with('{') {
            return Ok(None);
        }
        let (group, end) = self.parse_group(pos, Delimiter::Brace, 1)?;
        Ok(Some((group, end - pos)))
    }

    /// Recoverable conditions met so far
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }

    fn check_position(&self, pos: usize) -> ParseResult<()> {
        if pos > self.source.len() || !self.source.is_char_boundary(pos) {
            return Err(ParseError::new(pos, ParseErrorKind::InvalidPosition));
        }
        Ok(())
    }

    fn check_depth(&self, pos: usize, depth: usize) -> ParseResult<()> {
        if depth > self.options.max_depth {
            return Err(ParseError::new(
                pos,
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.options.max_depth,
                },
            ));
        }
        Ok(())
    }

    fn parse_list(
        &mut self,
        start: usize,
        until: Terminator<'a>,
        depth: usize,
    ) -> ParseResult<ListEnd> {
        let source = self.source;
        let db = self.db;
        let mut nodes = Vec::new();
        let mut pos = start;
        // Bare `[`...`]` pairs inside an optional argument
        let mut bracket_depth = 0usize;

        loop {
            let rest = &source[pos..];
            let Some(c) = rest.chars().next() else {
                return match until {
                    Terminator::EndOfInput => Ok(ListEnd {
                        nodes,
                        closer: pos,
                        end: pos,
                    }),
                    Terminator::Group { delimiter, open } => Err(ParseError::new(
                        open,
                        ParseErrorKind::UnterminatedGroup(delimiter),
                    )),
                    Terminator::Environment { name, open } => Err(ParseError::new(
                        open,
                        ParseErrorKind::UnterminatedEnvironment {
                            name: name.to_string(),
                        },
                    )),
                };
            };

            match c {
                '}' => {
                    if let Terminator::Group {
                        delimiter: Delimiter::Brace,
                        ..
                    } = until
                    {
                        return Ok(ListEnd {
                            nodes,
                            closer: pos,
                            end: pos + 1,
                        });
                    }
                    return Err(ParseError::new(
                        pos,
                        ParseErrorKind::UnexpectedClosingBrace,
                    ));
                }
                '{' => {
                    let (group, end) = self.parse_group(pos, Delimiter::Brace, depth + 1)?;
                    nodes.push(group);
                    pos = end;
                }
                '%' => {
                    let (text_end, end) = match rest.find('\n') {
                        Some(i) => (pos + i, pos + i + 1),
                        None => (source.len(), source.len()),
                    };
                    nodes.push(Node::Comment(CommentNode {
                        text: source[pos + 1..text_end].to_string(),
                        span: Span::new(pos, end),
                    }));
                    pos = end;
                }
                '\\' => match self.parse_escape(pos, until, depth, &mut nodes)? {
                    Step::Continue(end) => pos = end,
                    Step::Close { closer, end } => return Ok(ListEnd { nodes, closer, end }),
                },
                '[' | ']' if matches!(
                    until,
                    Terminator::Group {
                        delimiter: Delimiter::Bracket,
                        ..
                    }
                ) =>
                {
                    if c == ']' {
                        if bracket_depth == 0 {
                            return Ok(ListEnd {
                                nodes,
                                closer: pos,
                                end: pos + 1,
                            });
                        }
                        bracket_depth -= 1;
                    } else {
                        bracket_depth += 1;
                    }
                    push_text(&mut nodes, &rest[..1], pos);
                    pos += 1;
                }
                _ => {
                    if let Some((spec, len)) = db.lookup_specials_at(rest) {
                        let token = &rest[..len];
                        let (args, end) = self.parse_args(
                            spec.signature(),
                            SpecialsKey(token),
                            pos + len,
                            depth,
                        )?;
                        nodes.push(Node::Specials(SpecialsNode {
                            token: token.to_string(),
                            args,
                            span: Span::new(pos, end),
                        }));
                        pos = end;
                    } else {
                        let len = c.len_utf8();
                        push_text(&mut nodes, &rest[..len], pos);
                        pos += len;
                    }
                }
            }
        }
    }

    /// Handle a backslash at `pos`
    fn parse_escape(
        &mut self,
        pos: usize,
        until: Terminator<'a>,
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<Step> {
        let source = self.source;
        let db = self.db;
        let Some(name) = read_macro_name(&source[pos + 1..]) else {
            push_text(nodes, "\\", pos);
            return Ok(Step::Continue(pos + 1));
        };
        let after_name = pos + 1 + name.len();

        match name {
            "begin" => self
                .parse_environment(pos, after_name, depth, nodes)
                .map(Step::Continue),
            "end" => {
                let (found, end) = self.read_environment_name(after_name, "end")?;
                match until {
                    Terminator::Environment { name: expected, .. } if expected == found => {
                        Ok(Step::Close { closer: pos, end })
                    }
                    Terminator::Environment { name: expected, .. } => Err(ParseError::new(
                        pos,
                        ParseErrorKind::EnvironmentMismatch {
                            expected: expected.to_string(),
                            found: found.to_string(),
                        },
                    )),
                    _ => Err(ParseError::new(
                        pos,
                        ParseErrorKind::UnexpectedEnvironmentEnd {
                            name: found.to_string(),
                        },
                    )),
                }
            }
            _ => {
                let spec = db.lookup(SpecKind::Macro, name);
                if spec.is_none() {
                    log::debug!("unknown macro '\\{}' at offset {}", name, pos);
                    self.warnings.push(ConversionWarning::UnknownMacro {
                        name: name.to_string(),
                        position: pos,
                    });
                }
                match spec.or_else(|| db.unknown(SpecKind::Macro)) {
                    Some(spec) => {
                        let (args, end) = self.parse_args(
                            spec.signature(),
                            NamedKey(SpecKind::Macro, name),
                            after_name,
                            depth,
                        )?;
                        nodes.push(Node::Macro(MacroNode {
                            name: name.to_string(),
                            args,
                            span: Span::new(pos, end),
                        }));
                        Ok(Step::Continue(end))
                    }
                    None => {
                        push_text(nodes, &source[pos..after_name], pos);
                        Ok(Step::Continue(after_name))
                    }
                }
            }
        }
    }

    /// `\begin` at `begin_pos`; returns the offset past the matching `\end{...}`
    fn parse_environment(
        &mut self,
        begin_pos: usize,
        after_begin: usize,
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<usize> {
        let source = self.source;
        let db = self.db;
        let (name, after_name) = self.read_environment_name(after_begin, "begin")?;
        self.check_depth(begin_pos, depth + 1)?;

        let spec = db.lookup(SpecKind::Environment, name);
        if spec.is_none() {
            log::debug!("unknown environment '{}' at offset {}", name, begin_pos);
            self.warnings.push(ConversionWarning::UnknownEnvironment {
                name: name.to_string(),
                position: begin_pos,
            });
        }

        let until = Terminator::Environment {
            name,
            open: begin_pos,
        };
        match spec.or_else(|| db.unknown(SpecKind::Environment)) {
            Some(spec) => {
                let (args, body_start) = self.parse_args(
                    spec.signature(),
                    NamedKey(SpecKind::Environment, name),
                    after_name,
                    depth,
                )?;
                let list = self.parse_list(body_start, until, depth + 1)?;
                nodes.push(Node::Environment(EnvironmentNode {
                    name: name.to_string(),
                    args,
                    body: list.nodes,
                    span: Span::new(begin_pos, list.end),
                }));
                Ok(list.end)
            }
            None => {
                let list = self.parse_list(after_name, until, depth + 1)?;
                push_text(nodes, &source[begin_pos..after_name], begin_pos);
                for node in list.nodes {
                    push_node(nodes, node);
                }
                push_text(nodes, &source[list.closer..list.end], list.closer);
                Ok(list.end)
            }
        }
    }

    /// Resolve `signature` starting at `start`
    fn parse_args(
        &mut self,
        signature: &ArgSignature,
        key: impl ArgOwner,
        start: usize,
        depth: usize,
    ) -> ParseResult<(Vec<ArgSlot>, usize)> {
        let source = self.source;
        let mut args = Vec::with_capacity(signature.len());
        let mut pos = start;

        for (i, kind) in signature.iter().enumerate() {
            match kind {
                ArgKind::Mandatory => {
                    let at = skip_whitespace(source, pos);
                    if !source[at..].starts_with('{') {
                        return Err(ParseError::new(
                            at,
                            ParseErrorKind::MissingArgument {
                                kind: key.kind(),
                                name: key.name().to_string(),
                                slot: i + 1,
                            },
                        ));
                    }
                    let (group, end) = self.parse_group(at, Delimiter::Brace, depth + 1)?;
                    args.push(ArgSlot::Present(group));
                    pos = end;
                }
                ArgKind::Optional => {
                    if source[pos..].starts_with('[') {
                        let (group, end) = self.parse_group(pos, Delimiter::Bracket, depth + 1)?;
                        args.push(ArgSlot::Present(group));
                        pos = end;
                    } else {
                        args.push(ArgSlot::Absent);
                    }
                }
                ArgKind::OptionalStar => {
                    if source[pos..].starts_with('*') {
                        args.push(ArgSlot::Present(Node::Chars(CharsNode {
                            text: "*".to_string(),
                            span: Span::new(pos, pos + 1),
                        })));
                        pos += 1;
                    } else {
                        args.push(ArgSlot::Absent);
                    }
                }
            }
        }
        Ok((args, pos))
    }

    fn parse_group(
        &mut self,
        open: usize,
        delimiter: Delimiter,
        depth: usize,
    ) -> ParseResult<(Node, usize)> {
        self.check_depth(open, depth)?;
        let list = self.parse_list(open + 1, Terminator::Group { delimiter, open }, depth)?;
        let group = Node::Group(GroupNode {
            delimiter,
            body: list.nodes,
            span: Span::new(open, list.end),
        });
        Ok((group, list.end))
    }

    /// Read `{name}` after `\begin`/`\end`
    fn read_environment_name(&self, pos: usize, marker: &str) -> ParseResult<(&'a str, usize)> {
        let source = self.source;
        let malformed = || {
            ParseError::new(
                pos,
                ParseErrorKind::MalformedEnvironmentName {
                    marker: marker.to_string(),
                },
            )
        };

        let at = skip_whitespace(source, pos);
        if !source[at..].starts_with('{') {
            return Err(malformed());
        }
        let inner = at + 1;
        let close = source[inner..]
            .find(|c: char| matches!(c, '{' | '}' | '\\'))
            .map(|i| inner + i)
            .ok_or_else(malformed)?;
        if !source[close..].starts_with('}') {
            return Err(malformed());
        }
        let name = source[inner..close].trim();
        if name.is_empty() {
            return Err(malformed());
        }
        Ok((name, close + 1))
    }
}

/// Identifies the node whose arguments are being read, for error messages
trait ArgOwner {
    fn kind(&self) -> SpecKind;
    fn name(&self) -> &str;
}

struct NamedKey<'s>(SpecKind, &'s str);

struct SpecialsKey<'s>(&'s str);

impl ArgOwner for NamedKey<'_> {
    fn kind(&self) -> SpecKind {
        self.0
    }
    fn name(&self) -> &str {
        self.1
    }
}

impl ArgOwner for SpecialsKey<'_> {
    fn kind(&self) -> SpecKind {
        SpecKind::Specials
    }
    fn name(&self) -> &str {
        self.0
    }
}

/// Parse `text` against `db`.
///
/// Returns the nodes and the number of bytes consumed.
pub fn parse(text: &str, db: &ParsingDb) -> ParseResult<(Vec<Node>, usize)> {
    Walker::new(text, db).parse()
}

/// A run of ASCII letters, or a single other character
fn read_macro_name(rest: &str) -> Option<&str> {
    let first = rest.chars().next()?;
    if first.is_ascii_alphabetic() {
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        Some(&rest[..len])
    } else {
        Some(&rest[..first.len_utf8()])
    }
}

fn skip_whitespace(source: &str, pos: usize) -> usize {
    let rest = &source[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Append text, merging with a directly preceding `Chars` node
fn push_text(nodes: &mut Vec<Node>, text: &str, start: usize) {
    if let Some(Node::Chars(last)) = nodes.last_mut() {
        if last.span.end() == start {
            last.text.push_str(text);
            last.span.len += text.len();
            return;
        }
    }
    nodes.push(Node::Chars(CharsNode {
        text: text.to_string(),
        span: Span::new(start, start + text.len()),
    }));
}

fn push_node(nodes: &mut Vec<Node>, node: Node) {
    match node {
        Node::Chars(chars) => push_text(nodes, &chars.text, chars.span.start),
        other => nodes.push(other),
    }
}

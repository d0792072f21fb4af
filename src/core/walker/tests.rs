//! Regression tests for the walker

use super::*;
use crate::core::context::{Category, Placement};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn test_db() -> ParsingDb {
    let mut db = ParsingDb::new();
    db.add_category(
        Category::new("test").with_entries([
            Specification::macro_spec("putinquotes", "[[{").unwrap(),
            Specification::macro_spec("emph", "{").unwrap(),
            Specification::macro_spec("section", "*[{").unwrap(),
            Specification::macro_spec("%", "").unwrap(),
            Specification::environment_spec("inquotes", "[[").unwrap(),
            Specification::environment_spec("center", "").unwrap(),
            Specification::specials_spec("`").unwrap(),
            Specification::specials_spec("``").unwrap(),
            Specification::specials_spec("'").unwrap(),
            Specification::specials_spec("''").unwrap(),
        ]),
        Placement::Append,
    )
    .unwrap();
    db
}

fn parse_ok(input: &str) -> Vec<Node> {
    let (nodes, consumed) = parse(input, &test_db()).unwrap();
    assert_eq!(consumed, input.len());
    nodes
}

fn parse_err(input: &str) -> ParseError {
    parse(input, &test_db()).unwrap_err()
}

fn chars_of(node: &Node) -> &str {
    node.as_chars().unwrap_or_else(|| panic!("expected chars, got {:?}", node))
}

/// Concatenated text of a group's chars children
fn group_text(node: &Node) -> String {
    node.body()
        .iter()
        .map(|n| n.as_chars().unwrap_or("?"))
        .collect()
}

#[test]
fn test_plain_text_is_one_node() {
    let nodes = parse_ok("Hello, world");
    assert_eq!(nodes.len(), 1);
    assert_eq!(chars_of(&nodes[0]), "Hello, world");
    assert_eq!(nodes[0].span(), Span::new(0, 12));
}

#[test]
fn test_empty_input() {
    let (nodes, consumed) = parse("", &test_db()).unwrap();
    assert!(nodes.is_empty());
    assert_eq!(consumed, 0);
}

#[test]
fn test_macro_with_all_arguments() {
    let nodes = parse_ok(r"\putinquotes[<][>]{Hello}");
    assert_eq!(nodes.len(), 1);
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro, got {:?}", nodes[0]);
    };
    assert_eq!(m.name, "putinquotes");
    assert_eq!(m.args.len(), 3);
    assert_eq!(group_text(m.args[0].node().unwrap()), "<");
    assert_eq!(group_text(m.args[1].node().unwrap()), ">");
    assert_eq!(group_text(m.args[2].node().unwrap()), "Hello");
    assert!(matches!(
        m.args[0].node(),
        Some(Node::Group(GroupNode {
            delimiter: Delimiter::Bracket,
            ..
        }))
    ));
    assert_eq!(m.span, Span::new(0, 25));
}

#[test]
fn test_absent_optionals_do_not_advance() {
    let nodes = parse_ok(r"\putinquotes{Hello, world}");
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro");
    };
    assert_eq!(m.args[0], ArgSlot::Absent);
    assert_eq!(m.args[1], ArgSlot::Absent);
    assert_eq!(group_text(m.args[2].node().unwrap()), "Hello, world");
}

#[test]
fn test_bracket_without_optional_slot_is_text() {
    let nodes = parse_ok(r"\emph{x}[y]");
    assert_eq!(nodes.len(), 2);
    assert_eq!(chars_of(&nodes[1]), "[y]");
}

#[test]
fn test_optional_must_be_adjacent() {
    let nodes = parse_ok(r"\section {Title} [x]");
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro");
    };
    assert_eq!(m.args[0], ArgSlot::Absent);
    assert_eq!(m.args[1], ArgSlot::Absent);
    assert_eq!(group_text(m.args[2].node().unwrap()), "Title");
    assert_eq!(chars_of(&nodes[1]), " [x]");
}

#[test]
fn test_star_slot() {
    let nodes = parse_ok(r"\section*{Intro}");
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro");
    };
    assert_eq!(m.args[0].node().and_then(Node::as_chars), Some("*"));
    assert_eq!(m.args[1], ArgSlot::Absent);
}

#[test]
fn test_unknown_macro_degrades_to_text() {
    let db = test_db();
    let mut walker = Walker::new(r"a \foobar{x} b", &db);
    let (nodes, _) = walker.parse().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(chars_of(&nodes[0]), r"a \foobar");
    assert_eq!(group_text(&nodes[1]), "x");
    assert_eq!(chars_of(&nodes[2]), " b");
    assert_eq!(
        walker.warnings(),
        &[ConversionWarning::UnknownMacro {
            name: "foobar".to_string(),
            position: 2,
        }]
    );
}

#[test]
fn test_unknown_macro_uses_fallback_spec() {
    let mut db = test_db();
    db.set_unknown(
        SpecKind::Macro,
        Specification::macro_spec("unknown", "{").unwrap(),
    );
    let (nodes, _) = parse(r"\foobar{x}", &db).unwrap();
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro, got {:?}", nodes[0]);
    };
    assert_eq!(m.name, "foobar");
    assert_eq!(group_text(m.args[0].node().unwrap()), "x");
}

#[test]
fn test_single_character_macro_names() {
    let nodes = parse_ok(r"50\% off");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1].name(), Some("%"));
    assert_eq!(chars_of(&nodes[2]), " off");
}

#[test]
fn test_trailing_backslash_is_text() {
    let nodes = parse_ok("a\\");
    assert_eq!(nodes.len(), 1);
    assert_eq!(chars_of(&nodes[0]), "a\\");
}

#[test]
fn test_longest_specials_match() {
    let nodes = parse_ok("``x");
    assert_eq!(nodes.len(), 2);
    assert!(matches!(&nodes[0], Node::Specials(s) if s.token == "``"));
    assert_eq!(chars_of(&nodes[1]), "x");
}

#[test]
fn test_specials_between_text() {
    let nodes = parse_ok("don't");
    assert_eq!(nodes.len(), 3);
    assert_eq!(chars_of(&nodes[0]), "don");
    assert_eq!(nodes[1].name(), Some("'"));
    assert_eq!(chars_of(&nodes[2]), "t");
}

#[test]
fn test_environment() {
    let nodes = parse_ok(r"\begin{inquotes}[`][']Hello, world\end{inquotes}");
    assert_eq!(nodes.len(), 1);
    let Node::Environment(env) = &nodes[0] else {
        panic!("expected environment");
    };
    assert_eq!(env.name, "inquotes");
    assert_eq!(env.args.len(), 2);
    let open = env.args[0].node().unwrap();
    assert!(matches!(&open.body()[0], Node::Specials(s) if s.token == "`"));
    assert_eq!(env.body.len(), 1);
    assert_eq!(chars_of(&env.body[0]), "Hello, world");
}

#[test]
fn test_nested_environments() {
    let nodes =
        parse_ok(r"\begin{center}a\begin{inquotes}b\end{inquotes}c\end{center}");
    let Node::Environment(outer) = &nodes[0] else {
        panic!("expected environment");
    };
    assert_eq!(outer.body.len(), 3);
    assert_eq!(outer.body[1].name(), Some("inquotes"));
}

#[test]
fn test_environment_mismatch() {
    let err = parse_err(r"\begin{inquotes}Hello\end{outquotes}");
    assert_eq!(
        err.kind,
        ParseErrorKind::EnvironmentMismatch {
            expected: "inquotes".to_string(),
            found: "outquotes".to_string(),
        }
    );
    assert_eq!(err.position, 21);
}

#[test]
fn test_unterminated_environment() {
    let err = parse_err(r"x \begin{center}Hello");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnterminatedEnvironment {
            name: "center".to_string()
        }
    );
    assert_eq!(err.position, 2);
}

#[test]
fn test_stray_environment_end() {
    let err = parse_err(r"Hello\end{center}");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedEnvironmentEnd {
            name: "center".to_string()
        }
    );
}

#[test]
fn test_malformed_environment_name() {
    let err = parse_err(r"\begin center");
    assert_eq!(
        err.kind,
        ParseErrorKind::MalformedEnvironmentName {
            marker: "begin".to_string()
        }
    );
}

#[test]
fn test_unknown_environment_degrades_to_text() {
    let db = test_db();
    let mut walker = Walker::new(r"\begin{foo}x\emph{y}\end{foo}", &db);
    let (nodes, _) = walker.parse().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(chars_of(&nodes[0]), r"\begin{foo}x");
    assert_eq!(nodes[1].name(), Some("emph"));
    assert_eq!(chars_of(&nodes[2]), r"\end{foo}");
    assert!(matches!(
        walker.warnings(),
        [ConversionWarning::UnknownEnvironment { .. }]
    ));
}

#[test]
fn test_unknown_environment_still_requires_matching_end() {
    let err = parse_err(r"\begin{foo}x\end{bar}");
    assert!(matches!(
        err.kind,
        ParseErrorKind::EnvironmentMismatch { .. }
    ));
}

#[rstest]
#[case::unterminated_brace("{abc", 0, ParseErrorKind::UnterminatedGroup(Delimiter::Brace))]
#[case::nested_unterminated("a{b{c}", 1, ParseErrorKind::UnterminatedGroup(Delimiter::Brace))]
#[case::stray_close("abc}", 3, ParseErrorKind::UnexpectedClosingBrace)]
#[case::unterminated_bracket(
    r"\putinquotes[abc",
    12,
    ParseErrorKind::UnterminatedGroup(Delimiter::Bracket)
)]
fn test_unbalanced_groups(
    #[case] input: &str,
    #[case] position: usize,
    #[case] kind: ParseErrorKind,
) {
    assert_eq!(parse_err(input), ParseError::new(position, kind));
}

#[test]
fn test_missing_mandatory_argument() {
    let err = parse_err(r"\emph x");
    assert_eq!(
        err,
        ParseError::new(
            6,
            ParseErrorKind::MissingArgument {
                kind: SpecKind::Macro,
                name: "emph".to_string(),
                slot: 1,
            }
        )
    );

    let err = parse_err(r"\putinquotes[a][b]");
    assert!(matches!(
        err.kind,
        ParseErrorKind::MissingArgument { slot: 3, .. }
    ));
}

#[test]
fn test_mandatory_argument_skips_whitespace() {
    let nodes = parse_ok("\\emph \n {x}");
    assert_eq!(nodes.len(), 1);
    assert_eq!(group_text(nodes[0].arg(0).unwrap()), "x");
}

#[test]
fn test_nested_groups() {
    let nodes = parse_ok(r"{a{b}\emph{c{d}}e}");
    assert_eq!(nodes.len(), 1);
    let body = nodes[0].body();
    assert_eq!(body.len(), 4);
    assert_eq!(chars_of(&body[0]), "a");
    assert_eq!(group_text(&body[1]), "b");
    assert_eq!(body[2].name(), Some("emph"));
    assert_eq!(chars_of(&body[3]), "e");
}

#[test]
fn test_bracket_argument_protects_closing_bracket() {
    let nodes = parse_ok(r"\putinquotes[{]}][a[b]c]{x}");
    let Node::Macro(m) = &nodes[0] else {
        panic!("expected macro");
    };
    let first = m.args[0].node().unwrap();
    assert_eq!(group_text(&first.body()[0]), "]");
    assert_eq!(group_text(m.args[1].node().unwrap()), "a[b]c");
    assert_eq!(group_text(m.args[2].node().unwrap()), "x");
}

#[test]
fn test_comment() {
    let nodes = parse_ok("a% note\nb");
    assert_eq!(nodes.len(), 3);
    assert!(matches!(&nodes[1], Node::Comment(c) if c.text == " note"));
    assert_eq!(nodes[1].span(), Span::new(1, 8));
    assert_eq!(chars_of(&nodes[2]), "b");
}

#[test]
fn test_comment_at_end_of_input() {
    let nodes = parse_ok("a%{ not a group");
    assert_eq!(nodes.len(), 2);
    assert!(matches!(&nodes[1], Node::Comment(c) if c.text == "{ not a group"));
}

#[test]
fn test_determinism() {
    let db = test_db();
    let input = r"\section*[s]{T} \begin{inquotes}[``]''x\end{inquotes} \foo{y}";
    assert_eq!(parse(input, &db).unwrap(), parse(input, &db).unwrap());
}

fn assert_args_within(nodes: &[Node]) {
    for node in nodes {
        let span = node.span();
        for arg in node.args().iter().filter_map(ArgSlot::node) {
            assert!(span.contains(&arg.span()), "{:?} outside {:?}", arg, span);
            assert_args_within(std::slice::from_ref(arg));
        }
        for child in node.body() {
            assert!(span.contains(&child.span()), "{:?} outside {:?}", child, span);
        }
        assert_args_within(node.body());
    }
}

#[test]
fn test_argument_spans_stay_inside_parent() {
    let nodes = parse_ok(r"{\putinquotes[`][']{a \emph{b}}} \begin{inquotes}[x]{y}\end{inquotes}");
    assert_args_within(&nodes);
}

#[test]
fn test_max_depth() {
    let db = test_db();
    let options = ParseOptions { max_depth: 2 };
    assert!(Walker::with_options("{{x}}", &db, options.clone())
        .parse()
        .is_ok());
    let err = Walker::with_options("{{{x}}}", &db, options)
        .parse()
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 2 });
}

#[test]
fn test_parse_from_offset() {
    let db = test_db();
    let source = r"ignored {a}\emph{b}";
    let mut walker = Walker::new(source, &db);
    let (nodes, consumed) = walker.parse_from(8).unwrap();
    assert_eq!(consumed, source.len() - 8);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].span().start, 8);
}

#[test]
fn test_parse_from_invalid_offset() {
    let db = test_db();
    let mut walker = Walker::new("é", &db);
    assert_eq!(
        walker.parse_from(1).unwrap_err().kind,
        ParseErrorKind::InvalidPosition
    );
    assert!(walker.parse_from(5).is_err());
}

#[test]
fn test_parse_group_at() {
    let db = test_db();
    let source = r"x{a}{b} rest";
    let mut walker = Walker::new(source, &db);
    let (group, len) = walker.parse_group_at(1).unwrap().unwrap();
    assert_eq!(len, 3);
    assert_eq!(group_text(&group), "a");
    assert!(walker.parse_group_at(0).unwrap().is_none());
}

#[test]
fn test_prepended_category_changes_signature() {
    let mut db = test_db();
    db.add_category(
        Category::new("override")
            .with_entries([Specification::macro_spec("emph", "").unwrap()]),
        Placement::Prepend,
    )
    .unwrap();
    let (nodes, _) = parse(r"\emph{x}", &db).unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0].args().is_empty());
    assert_eq!(group_text(&nodes[1]), "x");
}

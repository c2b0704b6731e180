use rpl::{parse_source, render_diagnostic, DiagnosticKind};

#[test]
fn lexical_error_carries_position_and_lexeme() {
    let diagnostic = parse_source("role admin { can: re@d }").expect_err("bad character");
    assert_eq!(diagnostic.kind, DiagnosticKind::Lexical);
    assert_eq!(diagnostic.code, "E1000");
    assert_eq!(diagnostic.span.start.line, 1);
    assert_eq!(diagnostic.span.start.column, 21);
    assert_eq!(diagnostic.found.as_deref(), Some("@"));
}

#[test]
fn unterminated_string_is_lexical() {
    let diagnostic = parse_source("user u { dept: \"Eng }").expect_err("open string");
    assert_eq!(diagnostic.kind, DiagnosticKind::Lexical);
    assert_eq!(diagnostic.code, "E1001");
}

#[test]
fn unterminated_block_comment_is_lexical() {
    let diagnostic = parse_source("role r { can: * } /* dangling").expect_err("open comment");
    assert_eq!(diagnostic.code, "E1003");
}

#[test]
fn syntax_error_names_the_expected_set() {
    let diagnostic =
        parse_source("ALLOW action: read ON RESOURCE: r IF x 5").expect_err("missing operator");
    assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
    assert_eq!(diagnostic.found.as_deref(), Some("5"));
    assert_eq!(
        diagnostic.expected.as_deref(),
        Some("'==', '!=', '<', '>', '<=', or '>='")
    );
}

#[test]
fn error_position_spans_multiple_lines() {
    let diagnostic =
        parse_source("role admin { can: * }\nuser bob {\n  dept: ,\n}").expect_err("missing value");
    assert_eq!(diagnostic.code, "E1504");
    assert_eq!(diagnostic.span.start.line, 3);
    assert_eq!(diagnostic.span.start.column, 9);
    assert_eq!(diagnostic.found.as_deref(), Some(","));
}

#[test]
fn first_error_wins() {
    // Both the missing ':' and the later bad condition are wrong; only the
    // earlier one is reported.
    let diagnostic =
        parse_source("ALLOW action read ON RESOURCE: r IF ==").expect_err("two errors");
    assert_eq!(diagnostic.code, "E1501");
    assert_eq!(diagnostic.found.as_deref(), Some("read"));
    assert_eq!(diagnostic.expected.as_deref(), Some("':'"));
}

#[test]
fn rendering_includes_code_path_and_position() {
    let diagnostic = parse_source("role").expect_err("truncated");
    let rendered = render_diagnostic("policies/team.rpl", &diagnostic);
    let expected = "error[E1502] policies/team.rpl:1:5 expected role name after 'role'\n  found: end of input\n  expected: an identifier";
    assert_eq!(rendered, expected);
}

use rpl::{parse_source, print_program};

fn assert_roundtrip(source: &str) {
    let first = parse_source(source).expect("original parses");
    let printed = print_program(&first);
    let second = parse_source(&printed).expect("printed output parses");
    assert_eq!(first, second, "printed form:\n{printed}");
}

#[test]
fn declarations_roundtrip() {
    assert_roundtrip("role admin { can: * }");
    assert_roundtrip("role editor { can: read, write }");
    assert_roundtrip("user alice { dept: \"Eng\", level: 3, score: 2.5, active: true }");
    assert_roundtrip("resource report { owner: alice, grade: 'A' }");
}

#[test]
fn policy_rules_roundtrip() {
    assert_roundtrip("ALLOW action: read ON RESOURCE: report");
    assert_roundtrip("DENY action: delete, purge ON RESOURCE: \"archive/*\"");
    assert_roundtrip("ALLOW action: read ON RESOURCE: r IF user.dept == \"Eng\"");
}

#[test]
fn condition_shapes_roundtrip() {
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF x == 1 AND y == 2 OR NOT z == 3");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF (x == 1 OR y == 2) AND z == 3");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF NOT x == 1 AND y == 2");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF (NOT x == 1) AND y == 2");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF NOT (x == 1 AND y == 2) OR z == 3");
}

#[test]
fn expression_shapes_roundtrip() {
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF 1 + 2 * 3 == 7");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF (a + b) * 2 == 10");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF a - b - c == 0");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF a - (b - c) == 0");
    assert_roundtrip("ALLOW action: a ON RESOURCE: r IF x / (y * z) > 1.5");
}

#[test]
fn escapes_roundtrip() {
    assert_roundtrip("user u { note: \"tab\\there \\\"quoted\\\" back\\\\slash\" }");
    assert_roundtrip("user u { sep: '\\t', quote: '\\'' }");
}

#[test]
fn whitespace_and_comments_normalize_away() {
    let noisy = "role   admin/*inline*/{can:read,//trailing\nwrite}";
    let clean = "role admin { can: read, write }";
    let from_noisy = parse_source(noisy).expect("noisy parses");
    let from_clean = parse_source(clean).expect("clean parses");
    assert_eq!(from_noisy, from_clean);
    assert_eq!(print_program(&from_noisy), format!("{clean}\n"));
}

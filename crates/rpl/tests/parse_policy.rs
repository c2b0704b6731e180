use std::path::PathBuf;

use rpl::*;

fn demo_path(name: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|path| path.parent())
        .expect("workspace root")
        .join("demos")
        .join(name)
}

#[test]
fn full_policy_document() {
    let source = r#"
        role admin { can: * }
        user alice { dept: "Eng", level: 3 }
        resource report { owner: alice, pages: 12 }
        ALLOW action: read, write ON RESOURCE: report
            IF user.dept == "Eng" AND report.pages < 100 OR NOT user.level < 2
    "#;
    let program = parse_source(source).expect("document parses");
    assert_eq!(program.statements.len(), 4);

    assert_eq!(
        program.statements[0],
        Statement::Role(RoleDecl {
            name: "admin".to_string(),
            permissions: vec![Permission::Wildcard],
        })
    );
    assert_eq!(
        program.statements[1],
        Statement::User(UserDecl {
            name: "alice".to_string(),
            attributes: vec![
                Attribute {
                    key: "dept".to_string(),
                    value: Value::Str("Eng".to_string()),
                },
                Attribute {
                    key: "level".to_string(),
                    value: Value::Int(3),
                },
            ],
        })
    );
    assert_eq!(
        program.statements[2],
        Statement::Resource(ResourceDecl {
            name: "report".to_string(),
            attributes: vec![
                Attribute {
                    key: "owner".to_string(),
                    value: Value::Ident("alice".to_string()),
                },
                Attribute {
                    key: "pages".to_string(),
                    value: Value::Int(12),
                },
            ],
        })
    );

    let Statement::Policy(rule) = &program.statements[3] else {
        panic!("expected a policy rule");
    };
    assert_eq!(rule.effect, Effect::Allow);
    assert_eq!(rule.actions, vec!["read".to_string(), "write".to_string()]);
    assert_eq!(rule.resource, ResourceRef::Reference("report".to_string()));

    // AND binds tighter than OR; NOT claims the comparison to its right.
    let dept = Condition::Comparison(Comparison {
        left: Expr::Member {
            object: "user".to_string(),
            member: "dept".to_string(),
        },
        op: CmpOp::Eq,
        right: Expr::Str("Eng".to_string()),
    });
    let pages = Condition::Comparison(Comparison {
        left: Expr::Member {
            object: "report".to_string(),
            member: "pages".to_string(),
        },
        op: CmpOp::Lt,
        right: Expr::Int(100),
    });
    let level = Condition::Comparison(Comparison {
        left: Expr::Member {
            object: "user".to_string(),
            member: "level".to_string(),
        },
        op: CmpOp::Lt,
        right: Expr::Int(2),
    });
    assert_eq!(
        rule.condition,
        Some(Condition::Or(
            Box::new(Condition::And(Box::new(dept), Box::new(pages))),
            Box::new(Condition::Not(Box::new(level))),
        ))
    );
}

#[test]
fn demo_file_parses() {
    let program = parse_file(&demo_path("sample.rpl")).expect("demo parses");
    assert_eq!(program.statements.len(), 6);
    let kinds: Vec<&str> = program
        .statements
        .iter()
        .map(|s| match s {
            Statement::Role(_) => "role",
            Statement::User(_) => "user",
            Statement::Resource(_) => "resource",
            Statement::Policy(_) => "policy",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["role", "role", "user", "resource", "policy", "policy"]
    );
}

#[test]
fn ast_serializes_to_json() {
    let program = parse_source("DENY action: purge ON RESOURCE: \"archive\"").expect("parses");
    let json = serde_json::to_string_pretty(&program).expect("serializes");
    assert!(json.contains("\"Deny\""));
    assert!(json.contains("\"archive\""));
}

#[test]
fn missing_file_reports_io_error() {
    let err = parse_file(&demo_path("does-not-exist.rpl")).expect_err("missing file");
    assert!(matches!(err, RplError::Io(_)));
}

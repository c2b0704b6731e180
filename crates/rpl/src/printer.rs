//! Canonical text rendering of the AST. Reparsing printed output yields a
//! structurally equal tree, so parentheses are emitted exactly where a
//! child binds looser than its position requires.

use crate::ast::*;
use std::fmt::Write;

const PREC_COND_NOT: u8 = 3;
const PREC_COND_OR: u8 = 4;
const PREC_COND_AND: u8 = 5;
const PREC_COND_ATOM: u8 = u8::MAX;
const PREC_EXPR_ADD: u8 = 6;
const PREC_EXPR_MUL: u8 = 7;
const PREC_EXPR_ATOM: u8 = u8::MAX;

pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    for statement in &program.statements {
        out.push_str(&print_statement(statement));
        out.push('\n');
    }
    out
}

pub fn print_statement(statement: &Statement) -> String {
    match statement {
        Statement::Role(role) => {
            let permissions: Vec<String> = role
                .permissions
                .iter()
                .map(|p| match p {
                    Permission::Wildcard => "*".to_string(),
                    Permission::Named(name) => name.clone(),
                })
                .collect();
            format!("role {} {{ can: {} }}", role.name, permissions.join(", "))
        }
        Statement::User(user) => {
            format!("user {} {{ {} }}", user.name, print_attributes(&user.attributes))
        }
        Statement::Resource(resource) => format!(
            "resource {} {{ {} }}",
            resource.name,
            print_attributes(&resource.attributes)
        ),
        Statement::Policy(rule) => {
            let effect = match rule.effect {
                Effect::Allow => "ALLOW",
                Effect::Deny => "DENY",
            };
            let resource = match &rule.resource {
                ResourceRef::Literal(text) => quote_string(text),
                ResourceRef::Reference(name) => name.clone(),
            };
            let mut out = format!(
                "{effect} action: {} ON RESOURCE: {resource}",
                rule.actions.join(", ")
            );
            if let Some(condition) = &rule.condition {
                let _ = write!(out, " IF {}", print_condition(condition));
            }
            out
        }
    }
}

fn print_attributes(attributes: &[Attribute]) -> String {
    let entries: Vec<String> = attributes
        .iter()
        .map(|a| format!("{}: {}", a.key, print_value(&a.value)))
        .collect();
    entries.join(", ")
}

pub fn print_value(value: &Value) -> String {
    match value {
        Value::Str(text) => quote_string(text),
        Value::Char(ch) => quote_char(*ch),
        Value::Int(n) => n.to_string(),
        Value::Real(n) => print_real(*n),
        Value::Ident(name) => name.clone(),
        Value::Bool(b) => b.to_string(),
    }
}

pub fn print_condition(condition: &Condition) -> String {
    match condition {
        Condition::Not(operand) => {
            format!("NOT {}", print_condition_at(operand, PREC_COND_NOT))
        }
        Condition::And(left, right) => format!(
            "{} AND {}",
            print_condition_at(left, PREC_COND_AND),
            print_condition_at(right, PREC_COND_AND + 1),
        ),
        Condition::Or(left, right) => format!(
            "{} OR {}",
            print_condition_at(left, PREC_COND_OR),
            print_condition_at(right, PREC_COND_OR + 1),
        ),
        Condition::Comparison(comparison) => {
            let op = match comparison.op {
                CmpOp::Eq => "==",
                CmpOp::Ne => "!=",
                CmpOp::Lt => "<",
                CmpOp::Gt => ">",
                CmpOp::Le => "<=",
                CmpOp::Ge => ">=",
            };
            format!(
                "{} {op} {}",
                print_expr(&comparison.left),
                print_expr(&comparison.right)
            )
        }
    }
}

fn condition_prec(condition: &Condition) -> u8 {
    match condition {
        Condition::Not(_) => PREC_COND_NOT,
        Condition::Or(_, _) => PREC_COND_OR,
        Condition::And(_, _) => PREC_COND_AND,
        Condition::Comparison(_) => PREC_COND_ATOM,
    }
}

fn print_condition_at(condition: &Condition, floor: u8) -> String {
    let text = print_condition(condition);
    if condition_prec(condition) < floor {
        format!("({text})")
    } else {
        text
    }
}

pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(n) => n.to_string(),
        Expr::Real(n) => print_real(*n),
        Expr::Str(text) => quote_string(text),
        Expr::Ident(name) => name.clone(),
        Expr::Member { object, member } => format!("{object}.{member}"),
        Expr::Binary { op, left, right } => {
            let (symbol, prec) = match op {
                BinOp::Add => ("+", PREC_EXPR_ADD),
                BinOp::Sub => ("-", PREC_EXPR_ADD),
                BinOp::Mul => ("*", PREC_EXPR_MUL),
                BinOp::Div => ("/", PREC_EXPR_MUL),
            };
            format!(
                "{} {symbol} {}",
                print_expr_at(left, prec),
                print_expr_at(right, prec + 1),
            )
        }
    }
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => match op {
            BinOp::Add | BinOp::Sub => PREC_EXPR_ADD,
            BinOp::Mul | BinOp::Div => PREC_EXPR_MUL,
        },
        _ => PREC_EXPR_ATOM,
    }
}

fn print_expr_at(expr: &Expr, floor: u8) -> String {
    let text = print_expr(expr);
    if expr_prec(expr) < floor {
        format!("({text})")
    } else {
        text
    }
}

// Reals must keep a decimal point so the reparse lexes them as reals again.
fn print_real(n: f64) -> String {
    let text = n.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        push_escaped(&mut out, ch, '"');
    }
    out.push('"');
    out
}

fn quote_char(ch: char) -> String {
    let mut out = String::with_capacity(4);
    out.push('\'');
    push_escaped(&mut out, ch, '\'');
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, ch: char, quote: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        _ if ch == quote => {
            out.push('\\');
            out.push(quote);
        }
        _ => out.push(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn reprint(source: &str) -> String {
        let program = parse_source(source).expect("source parses");
        print_program(&program)
    }

    #[test]
    fn statements_render_canonically() {
        let printed = reprint(
            "role admin{can:read,*}\nuser u{dept:\"Eng\",level:3}\nDENY action:purge ON RESOURCE:\"archive\"",
        );
        assert_eq!(
            printed,
            "role admin { can: read, * }\n\
             user u { dept: \"Eng\", level: 3 }\n\
             DENY action: purge ON RESOURCE: \"archive\"\n"
        );
    }

    #[test]
    fn redundant_parentheses_disappear() {
        let printed = reprint("ALLOW action: read ON RESOURCE: r IF ((a == 1)) AND (b == 2)");
        assert_eq!(
            printed,
            "ALLOW action: read ON RESOURCE: r IF a == 1 AND b == 2\n"
        );
    }

    #[test]
    fn necessary_parentheses_survive() {
        let printed = reprint("ALLOW action: read ON RESOURCE: r IF (a == 1 OR b == 2) AND c == 3");
        assert_eq!(
            printed,
            "ALLOW action: read ON RESOURCE: r IF (a == 1 OR b == 2) AND c == 3\n"
        );
    }

    #[test]
    fn not_over_and_prints_without_parentheses() {
        let printed = reprint("ALLOW action: read ON RESOURCE: r IF NOT a == 1 AND b == 2");
        assert_eq!(
            printed,
            "ALLOW action: read ON RESOURCE: r IF NOT a == 1 AND b == 2\n"
        );
    }

    #[test]
    fn expression_grouping_survives() {
        let printed = reprint("ALLOW action: read ON RESOURCE: r IF (a + b) * 2 == 10");
        assert_eq!(
            printed,
            "ALLOW action: read ON RESOURCE: r IF (a + b) * 2 == 10\n"
        );
    }

    #[test]
    fn reals_keep_their_decimal_point() {
        assert_eq!(print_value(&Value::Real(3.0)), "3.0");
        assert_eq!(print_value(&Value::Real(2.5)), "2.5");
    }

    #[test]
    fn strings_escape_on_output() {
        assert_eq!(
            print_value(&Value::Str("a\"b\\c\n".to_string())),
            "\"a\\\"b\\\\c\\n\""
        );
        assert_eq!(print_value(&Value::Char('\'')), "'\\''");
    }
}

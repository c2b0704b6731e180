use crate::ast::*;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::lexer::{lex, Token, TokenKind};

pub type ParseResult<T> = Result<T, Diagnostic>;

/// Parse one RPL document. Fails fast: the first lexical or structural
/// error aborts the attempt and no partial AST is returned.
pub fn parse_source(source: &str) -> ParseResult<Program> {
    let tokens = lex(source)?;
    Parser::new(tokens).parse_program()
}

// Precedence floors for the two climbing loops, transcribed from the
// original left-recursive grammar. NOT's operand floor sits below both
// AND and OR, so a bare NOT extends over the connectives to its right.
const PREC_COND_OR: u8 = 4;
const PREC_COND_AND: u8 = 5;
const PREC_COND_NOT_OPERAND: u8 = 3;
const PREC_EXPR_ADD: u8 = 6;
const PREC_EXPR_MUL: u8 = 7;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Role => statements.push(Statement::Role(self.parse_role_decl()?)),
                TokenKind::User => statements.push(Statement::User(self.parse_user_decl()?)),
                TokenKind::Resource => {
                    statements.push(Statement::Resource(self.parse_resource_decl()?))
                }
                TokenKind::Allow | TokenKind::Deny => {
                    statements.push(Statement::Policy(self.parse_policy_rule()?))
                }
                TokenKind::Eof => break,
                _ => {
                    return Err(self.unexpected(
                        "E1500",
                        "expected a declaration or policy rule",
                        "'role', 'user', 'resource', 'ALLOW', 'DENY', or end of input",
                    ))
                }
            }
        }
        Ok(Program { statements })
    }

    fn parse_role_decl(&mut self) -> ParseResult<RoleDecl> {
        self.bump();
        let name = self.expect_ident("expected role name after 'role'")?;
        self.expect(TokenKind::LBrace, "expected '{' to start role body")?;
        self.expect(TokenKind::Can, "expected 'can' in role body")?;
        self.expect(TokenKind::Colon, "expected ':' after 'can'")?;
        let mut permissions = vec![self.parse_permission()?];
        while self.eat(TokenKind::Comma) {
            permissions.push(self.parse_permission()?);
        }
        self.expect(TokenKind::RBrace, "expected '}' to close role body")?;
        Ok(RoleDecl { name, permissions })
    }

    fn parse_permission(&mut self) -> ParseResult<Permission> {
        if self.eat(TokenKind::Star) {
            return Ok(Permission::Wildcard);
        }
        if self.at(TokenKind::Ident) {
            return Ok(Permission::Named(self.bump().text));
        }
        Err(self.unexpected("E1503", "expected a permission", "'*' or an identifier"))
    }

    fn parse_user_decl(&mut self) -> ParseResult<UserDecl> {
        self.bump();
        let name = self.expect_ident("expected user name after 'user'")?;
        self.expect(TokenKind::LBrace, "expected '{' to start user body")?;
        let attributes = self.parse_attributes()?;
        self.expect(TokenKind::RBrace, "expected '}' to close user body")?;
        Ok(UserDecl { name, attributes })
    }

    fn parse_resource_decl(&mut self) -> ParseResult<ResourceDecl> {
        self.bump();
        let name = self.expect_ident("expected resource name after 'resource'")?;
        self.expect(TokenKind::LBrace, "expected '{' to start resource body")?;
        let attributes = self.parse_attributes()?;
        self.expect(TokenKind::RBrace, "expected '}' to close resource body")?;
        Ok(ResourceDecl { name, attributes })
    }

    fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = vec![self.parse_attribute()?];
        while self.eat(TokenKind::Comma) {
            attributes.push(self.parse_attribute()?);
        }
        Ok(attributes)
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let key = self.expect_ident("expected attribute name")?;
        self.expect(TokenKind::Colon, "expected ':' after attribute name")?;
        let value = self.parse_value()?;
        Ok(Attribute { key, value })
    }

    fn parse_value(&mut self) -> ParseResult<Value> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Str => {
                self.bump();
                Ok(Value::Str(decode_string_literal(&token.text)))
            }
            TokenKind::Char => {
                self.bump();
                match decode_char_literal(&token.text) {
                    Some(ch) => Ok(Value::Char(ch)),
                    None => Err(Diagnostic {
                        kind: DiagnosticKind::Syntax,
                        code: "E1509".to_string(),
                        message: "empty character literal".to_string(),
                        span: token.span.clone(),
                        found: Some(token.text.clone()),
                        expected: None,
                    }),
                }
            }
            TokenKind::Int => {
                self.bump();
                Ok(Value::Int(self.parse_int_text(&token)?))
            }
            TokenKind::Real => {
                self.bump();
                Ok(Value::Real(self.parse_real_text(&token)?))
            }
            TokenKind::Bool => {
                self.bump();
                Ok(Value::Bool(token.text == "true"))
            }
            TokenKind::Ident => {
                self.bump();
                Ok(Value::Ident(token.text))
            }
            _ => Err(self.unexpected(
                "E1504",
                "expected an attribute value",
                "a string, character, number, boolean, or identifier",
            )),
        }
    }

    fn parse_policy_rule(&mut self) -> ParseResult<PolicyRule> {
        let effect = if self.bump().kind == TokenKind::Allow {
            Effect::Allow
        } else {
            Effect::Deny
        };
        self.expect(TokenKind::Action, "expected 'action' after policy effect")?;
        self.expect(TokenKind::Colon, "expected ':' after 'action'")?;
        let mut actions = vec![self.expect_ident("expected an action name")?];
        while self.eat(TokenKind::Comma) {
            actions.push(self.expect_ident("expected an action name after ','")?);
        }
        self.expect(TokenKind::On, "expected 'ON' after action list")?;
        self.expect(TokenKind::Resource, "expected 'RESOURCE' after 'ON'")?;
        self.expect(TokenKind::Colon, "expected ':' after 'RESOURCE'")?;
        let resource = self.parse_resource_ref()?;
        let condition = if self.eat(TokenKind::If) {
            Some(self.parse_condition(0)?)
        } else {
            None
        };
        Ok(PolicyRule {
            effect,
            actions,
            resource,
            condition,
        })
    }

    fn parse_resource_ref(&mut self) -> ParseResult<ResourceRef> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Str => {
                self.bump();
                Ok(ResourceRef::Literal(decode_string_literal(&token.text)))
            }
            TokenKind::Ident => {
                self.bump();
                Ok(ResourceRef::Reference(token.text))
            }
            _ => Err(self.unexpected(
                "E1505",
                "expected a resource reference",
                "a quoted string or an identifier",
            )),
        }
    }

    fn parse_condition(&mut self, min_prec: u8) -> ParseResult<Condition> {
        let mut left = self.parse_condition_primary()?;
        loop {
            let (prec, is_and) = match self.peek().kind {
                TokenKind::And => (PREC_COND_AND, true),
                TokenKind::Or => (PREC_COND_OR, false),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            let right = self.parse_condition(prec + 1)?;
            left = if is_and {
                Condition::And(Box::new(left), Box::new(right))
            } else {
                Condition::Or(Box::new(left), Box::new(right))
            };
        }
        Ok(left)
    }

    fn parse_condition_primary(&mut self) -> ParseResult<Condition> {
        if self.eat(TokenKind::Not) {
            let operand = self.parse_condition(PREC_COND_NOT_OPERAND)?;
            return Ok(Condition::Not(Box::new(operand)));
        }
        if self.at(TokenKind::LParen) {
            // '(' may open a grouped condition or a parenthesized expression
            // on the left of a comparison. Try the comparison and rewind.
            let checkpoint = self.pos;
            if let Ok(comparison) = self.parse_comparison() {
                return Ok(Condition::Comparison(comparison));
            }
            self.pos = checkpoint;
            self.bump();
            let inner = self.parse_condition(0)?;
            self.expect(TokenKind::RParen, "expected ')' to close condition group")?;
            return Ok(inner);
        }
        Ok(Condition::Comparison(self.parse_comparison()?))
    }

    fn parse_comparison(&mut self) -> ParseResult<Comparison> {
        let left = self.parse_expr(0)?;
        let op = match self.peek().kind {
            TokenKind::Eq => CmpOp::Eq,
            TokenKind::Ne => CmpOp::Ne,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Ge => CmpOp::Ge,
            _ => {
                return Err(self.unexpected(
                    "E1506",
                    "expected a comparison operator",
                    "'==', '!=', '<', '>', '<=', or '>='",
                ))
            }
        };
        self.bump();
        let right = self.parse_expr(0)?;
        Ok(Comparison { left, op, right })
    }

    fn parse_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_expr_primary()?;
        loop {
            let (op, prec) = match self.peek().kind {
                TokenKind::Star => (BinOp::Mul, PREC_EXPR_MUL),
                TokenKind::Slash => (BinOp::Div, PREC_EXPR_MUL),
                TokenKind::Plus => (BinOp::Add, PREC_EXPR_ADD),
                TokenKind::Minus => (BinOp::Sub, PREC_EXPR_ADD),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            let right = self.parse_expr(prec + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_expr_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RParen, "expected ')' to close expression group")?;
                Ok(inner)
            }
            TokenKind::Int => {
                self.bump();
                Ok(Expr::Int(self.parse_int_text(&token)?))
            }
            TokenKind::Real => {
                self.bump();
                Ok(Expr::Real(self.parse_real_text(&token)?))
            }
            TokenKind::Str => {
                self.bump();
                Ok(Expr::Str(decode_string_literal(&token.text)))
            }
            TokenKind::Ident => {
                self.bump();
                if self.eat(TokenKind::Dot) {
                    let member = self.expect_ident("expected attribute name after '.'")?;
                    return Ok(Expr::Member {
                        object: token.text,
                        member,
                    });
                }
                Ok(Expr::Ident(token.text))
            }
            _ => Err(self.unexpected(
                "E1507",
                "expected an expression",
                "'(', a number, a string, or an identifier",
            )),
        }
    }

    fn parse_int_text(&self, token: &Token) -> ParseResult<i64> {
        token.text.parse::<i64>().map_err(|_| Diagnostic {
            kind: DiagnosticKind::Syntax,
            code: "E1508".to_string(),
            message: "integer literal out of range".to_string(),
            span: token.span.clone(),
            found: Some(token.text.clone()),
            expected: None,
        })
    }

    fn parse_real_text(&self, token: &Token) -> ParseResult<f64> {
        // f64 parsing saturates to infinity on overflow rather than failing.
        token.text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| Diagnostic {
                kind: DiagnosticKind::Syntax,
                code: "E1508".to_string(),
                message: "real literal out of range".to_string(),
                span: token.span.clone(),
                found: Some(token.text.clone()),
                expected: None,
            })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.at(kind) {
            return Ok(self.bump());
        }
        Err(self.unexpected("E1501", message, kind.describe()))
    }

    fn expect_ident(&mut self, message: &str) -> ParseResult<String> {
        if self.at(TokenKind::Ident) {
            return Ok(self.bump().text);
        }
        Err(self.unexpected("E1502", message, "an identifier"))
    }

    fn unexpected(&self, code: &str, message: &str, expected: &str) -> Diagnostic {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            token.text.clone()
        };
        Diagnostic {
            kind: DiagnosticKind::Syntax,
            code: code.to_string(),
            message: message.to_string(),
            span: token.span.clone(),
            found: Some(found),
            expected: Some(expected.to_string()),
        }
    }
}

fn decode_string_literal(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    decode_escapes(inner)
}

// The lexer never emits an empty Char token, so `None` here means a
// malformed token reached the parser by some other route.
fn decode_char_literal(text: &str) -> Option<char> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    decode_escapes(inner).chars().next()
}

fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Position, Span};
use crate::syntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Role,
    User,
    Resource,
    Allow,
    Deny,
    Action,
    On,
    If,
    And,
    Or,
    Not,
    Can,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Dot,
    Bool,
    Int,
    Real,
    Str,
    Char,
    Ident,
    Eof,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Role => "'role'",
            TokenKind::User => "'user'",
            TokenKind::Resource => "'RESOURCE'",
            TokenKind::Allow => "'ALLOW'",
            TokenKind::Deny => "'DENY'",
            TokenKind::Action => "'action'",
            TokenKind::On => "'ON'",
            TokenKind::If => "'IF'",
            TokenKind::And => "'AND'",
            TokenKind::Or => "'OR'",
            TokenKind::Not => "'NOT'",
            TokenKind::Can => "'can'",
            TokenKind::Eq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Bool => "a boolean literal",
            TokenKind::Int => "an integer literal",
            TokenKind::Real => "a real literal",
            TokenKind::Str => "a string literal",
            TokenKind::Char => "a character literal",
            TokenKind::Ident => "an identifier",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

/// Scan a full RPL document into tokens. Stops at the first lexical error;
/// on success the stream always ends with a single `Eof` token.
pub fn lex(content: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();

    let chars: Vec<char> = content.chars().collect();
    let mut index = 0usize;
    let mut line = 1usize;
    let mut col = 1usize;

    while index < chars.len() {
        let ch = chars[index];

        if ch == '\n' {
            index += 1;
            line += 1;
            col = 1;
            continue;
        }

        if ch == ' ' || ch == '\t' || ch == '\r' {
            index += 1;
            col += 1;
            continue;
        }

        // Line comments run to end-of-line.
        if ch == '/' && index + 1 < chars.len() && chars[index + 1] == '/' {
            while index < chars.len() && chars[index] != '\n' {
                index += 1;
                col += 1;
            }
            continue;
        }

        if ch == '/' && index + 1 < chars.len() && chars[index + 1] == '*' {
            let start_line = line;
            let start_col = col;
            index += 2;
            col += 2;
            let mut closed = false;
            while index < chars.len() {
                if chars[index] == '\n' {
                    index += 1;
                    line += 1;
                    col = 1;
                    continue;
                }
                if chars[index] == '*' && index + 1 < chars.len() && chars[index + 1] == '/' {
                    index += 2;
                    col += 2;
                    closed = true;
                    break;
                }
                index += 1;
                col += 1;
            }
            if !closed {
                return Err(lex_error(
                    "E1003",
                    "unterminated block comment",
                    span_multiline(start_line, start_col, line, col.max(1)),
                    Some("/*".to_string()),
                ));
            }
            continue;
        }

        if ch == '"' {
            let start = index;
            let start_col = col;
            index += 1;
            col += 1;
            let mut closed = false;
            while index < chars.len() {
                if chars[index] == '\n' {
                    break;
                }
                if chars[index] == '\\' && index + 1 < chars.len() && chars[index + 1] != '\n' {
                    index += 2;
                    col += 2;
                    continue;
                }
                if chars[index] == '"' {
                    index += 1;
                    col += 1;
                    closed = true;
                    break;
                }
                index += 1;
                col += 1;
            }
            let text: String = chars[start..index.min(chars.len())].iter().collect();
            if !closed {
                return Err(lex_error(
                    "E1001",
                    "unterminated string literal",
                    span_single(line, start_col, index - start),
                    Some(text),
                ));
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                text,
                span: span_single(line, start_col, index - start),
            });
            continue;
        }

        if ch == '\'' {
            let start = index;
            let start_col = col;
            index += 1;
            col += 1;
            let mut has_char = false;
            if index < chars.len() && chars[index] == '\\' && index + 1 < chars.len() {
                index += 2;
                col += 2;
                has_char = true;
            } else if index < chars.len() && chars[index] != '\n' && chars[index] != '\'' {
                index += 1;
                col += 1;
                has_char = true;
            }
            let closed = index < chars.len() && chars[index] == '\'';
            if closed {
                index += 1;
                col += 1;
            }
            let text: String = chars[start..index.min(chars.len())].iter().collect();
            if !closed {
                return Err(lex_error(
                    "E1002",
                    "unterminated character literal",
                    span_single(line, start_col, index - start),
                    Some(text),
                ));
            }
            // `''` carries no character at all.
            if !has_char {
                return Err(lex_error(
                    "E1004",
                    "empty character literal",
                    span_single(line, start_col, index - start),
                    Some(text),
                ));
            }
            tokens.push(Token {
                kind: TokenKind::Char,
                text,
                span: span_single(line, start_col, index - start),
            });
            continue;
        }

        if is_ident_start(ch) {
            let start = index;
            let start_col = col;
            index += 1;
            col += 1;
            while index < chars.len() && is_ident_continue(chars[index]) {
                index += 1;
                col += 1;
            }
            let text: String = chars[start..index].iter().collect();
            let kind = syntax::keyword_kind(&text).unwrap_or(TokenKind::Ident);
            tokens.push(Token {
                kind,
                text,
                span: span_single(line, start_col, index - start),
            });
            continue;
        }

        if ch.is_ascii_digit() {
            let start = index;
            let start_col = col;
            index += 1;
            col += 1;
            while index < chars.len() && chars[index].is_ascii_digit() {
                index += 1;
                col += 1;
            }
            let mut kind = TokenKind::Int;
            if index + 1 < chars.len() && chars[index] == '.' && chars[index + 1].is_ascii_digit() {
                kind = TokenKind::Real;
                index += 1;
                col += 1;
                while index < chars.len() && chars[index].is_ascii_digit() {
                    index += 1;
                    col += 1;
                }
            }
            let text: String = chars[start..index].iter().collect();
            tokens.push(Token {
                kind,
                text,
                span: span_single(line, start_col, index - start),
            });
            continue;
        }

        if let Some((kind, text, len)) = match_symbol(&chars, index) {
            tokens.push(Token {
                kind,
                text,
                span: span_single(line, col, len),
            });
            index += len;
            col += len;
            continue;
        }

        return Err(lex_error(
            "E1000",
            &format!("unexpected character '{ch}'"),
            span_single(line, col, 1),
            Some(ch.to_string()),
        ));
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        span: span_single(line, col.max(1), 0),
    });

    Ok(tokens)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn match_symbol(chars: &[char], index: usize) -> Option<(TokenKind, String, usize)> {
    if index + 1 < chars.len() {
        for (needle, kind) in syntax::SYMBOLS_2 {
            if chars[index] == needle[0] && chars[index + 1] == needle[1] {
                return Some((*kind, needle.iter().collect(), 2));
            }
        }
    }

    let ch = chars[index];
    for (needle, kind) in syntax::SYMBOLS_1 {
        if ch == *needle {
            return Some((*kind, ch.to_string(), 1));
        }
    }

    None
}

fn lex_error(code: &str, message: &str, span: Span, found: Option<String>) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::Lexical,
        code: code.to_string(),
        message: message.to_string(),
        span,
        found,
        expected: None,
    }
}

fn span_single(line: usize, column: usize, len: usize) -> Span {
    Span {
        start: Position { line, column },
        end: Position {
            line,
            column: if len == 0 { column } else { column + len - 1 },
        },
    }
}

fn span_multiline(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Span {
    Span {
        start: Position {
            line: start_line,
            column: start_col,
        },
        end: Position {
            line: end_line,
            column: end_col,
        },
    }
}

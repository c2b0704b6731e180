//! Terminal vocabulary of RPL: keyword spellings and operator tables
//! consumed by the lexer.

use crate::lexer::TokenKind;

// Declarations use lowercase keywords, policy rules uppercase ones.
// `RESOURCE` is the spelling policy rules use for the same token the
// `resource` declaration keyword produces.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("role", TokenKind::Role),
    ("user", TokenKind::User),
    ("resource", TokenKind::Resource),
    ("RESOURCE", TokenKind::Resource),
    ("can", TokenKind::Can),
    ("action", TokenKind::Action),
    ("ALLOW", TokenKind::Allow),
    ("DENY", TokenKind::Deny),
    ("ON", TokenKind::On),
    ("IF", TokenKind::If),
    ("AND", TokenKind::And),
    ("OR", TokenKind::Or),
    ("NOT", TokenKind::Not),
    ("true", TokenKind::Bool),
    ("false", TokenKind::Bool),
];

pub const SYMBOLS_2: &[([char; 2], TokenKind)] = &[
    (['=', '='], TokenKind::Eq),
    (['!', '='], TokenKind::Ne),
    (['<', '='], TokenKind::Le),
    (['>', '='], TokenKind::Ge),
];

pub const SYMBOLS_1: &[(char, TokenKind)] = &[
    ('<', TokenKind::Lt),
    ('>', TokenKind::Gt),
    ('+', TokenKind::Plus),
    ('-', TokenKind::Minus),
    ('*', TokenKind::Star),
    ('/', TokenKind::Slash),
    ('(', TokenKind::LParen),
    (')', TokenKind::RParen),
    ('{', TokenKind::LBrace),
    ('}', TokenKind::RBrace),
    (':', TokenKind::Colon),
    (',', TokenKind::Comma),
    ('.', TokenKind::Dot),
];

/// Classify an identifier-shaped lexeme. Reserved words win over the
/// generic identifier kind.
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, kind)| *kind)
}

//! RPL, a role policy language: role/user/resource declarations plus
//! ALLOW/DENY rules with an optional IF condition. This crate covers the
//! textual front end: lexing, parsing to an immutable AST, diagnostics,
//! and canonical printing. Evaluation lives elsewhere.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod printer;
mod syntax;

use std::fs;
use std::path::Path;

pub use ast::{
    Attribute, BinOp, CmpOp, Comparison, Condition, Effect, Expr, Permission, PolicyRule, Program,
    ResourceDecl, ResourceRef, RoleDecl, Statement, UserDecl, Value,
};
pub use diagnostics::{render_diagnostic, Diagnostic, DiagnosticKind, Position, Span};
pub use lexer::{lex, Token, TokenKind};
pub use parser::{parse_source, ParseResult};
pub use printer::{print_condition, print_expr, print_program, print_statement, print_value};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RplError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{}", render_diagnostic(path, diagnostic))]
    Parse {
        path: String,
        diagnostic: Diagnostic,
    },
    /// Errors were already rendered to stderr; the caller only needs the
    /// failing exit status.
    #[error("")]
    Diagnostics,
}

pub fn parse_file(path: &Path) -> Result<Program, RplError> {
    let content = fs::read_to_string(path)?;
    parse_source(&content).map_err(|diagnostic| RplError::Parse {
        path: path.display().to_string(),
        diagnostic,
    })
}

/// Parse without keeping the tree. `Err` carries the rendered position and
/// expected-set detail for the first offense in the file.
pub fn check_file(path: &Path) -> Result<(), RplError> {
    parse_file(path).map(|_| ())
}

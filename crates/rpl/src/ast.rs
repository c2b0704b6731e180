//! The RPL abstract syntax tree: pure data, produced once per parse and
//! immutable afterwards. One enum per grammar rule, one variant per
//! alternative; parenthesized groupings never appear as nodes.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Role(RoleDecl),
    User(UserDecl),
    Resource(ResourceDecl),
    Policy(PolicyRule),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDecl {
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Permission {
    Wildcard,
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDecl {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDecl {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// One `key: value` entry. Duplicate keys are legal here; the parser keeps
/// them in source order and leaves resolution to the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Str(String),
    Char(char),
    Int(i64),
    Real(f64),
    Ident(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResourceRef {
    Literal(String),
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRule {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resource: ResourceRef,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Comparison(Comparison),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub left: Expr,
    pub op: CmpOp,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Int(i64),
    Real(f64),
    Str(String),
    Ident(String),
    /// Exactly one dot deep: `object.member`. The grammar has no rule for
    /// deeper chains.
    Member { object: String, member: String },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

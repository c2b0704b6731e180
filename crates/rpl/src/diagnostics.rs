use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
}

/// A single terminal error for a parse attempt. `found` carries the
/// offending lexeme (absent at end of input), `expected` a rendering of
/// the terminal set the grammar admitted at that point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: String,
    pub message: String,
    pub span: Span,
    pub found: Option<String>,
    pub expected: Option<String>,
}

pub fn render_diagnostic(path: &str, diagnostic: &Diagnostic) -> String {
    let mut output = String::new();
    let start = &diagnostic.span.start;
    output.push_str(&format!(
        "error[{}] {}:{}:{} {}\n",
        diagnostic.code, path, start.line, start.column, diagnostic.message
    ));
    if let Some(found) = &diagnostic.found {
        output.push_str(&format!("  found: {found}\n"));
    }
    if let Some(expected) = &diagnostic.expected {
        output.push_str(&format!("  expected: {expected}\n"));
    }
    output.trim_end().to_string()
}

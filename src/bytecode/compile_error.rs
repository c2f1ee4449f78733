use crate::frontend::token::{Token, TokenKind};

/// What a diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The offending token's source text.
    Lexeme(String),
    /// The end of the input.
    End,
    /// No token text to show (scanner errors carry their own message).
    Unlocated,
}

/// One reported compile error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    /// Builds a diagnostic positioned at `token`, scanned from `source`.
    pub fn at(token: &Token, source: &str, message: impl Into<String>) -> Self {
        let location = match token.kind {
            TokenKind::Eof => Location::End,
            TokenKind::Error => Location::Unlocated,
            _ => Location::Lexeme(token.text(source).to_string()),
        };

        Diagnostic {
            line: token.line,
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    /// Formats as `[line N] Error at 'x': message`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            Location::Lexeme(text) => write!(f, " at '{}'", text)?,
            Location::End => write!(f, " at end")?,
            Location::Unlocated => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Compilation failed; carries every diagnostic that was reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.diagnostics))]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

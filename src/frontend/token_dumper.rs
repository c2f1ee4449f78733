use std::fmt::Write;

use crate::frontend::scanner::Scanner;
use crate::frontend::token::{Lexeme, Token, TokenKind};

pub struct TokenDumper {
    pub color: bool,
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const RED: &'static str = "\x1b[31m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";
    const BLU: &'static str = "\x1b[34m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Scans `source` to the end and prints one line per token.
    pub fn dump(&self, source: &str) {
        print!("{}", self.render(source));
    }

    /// Scans `source` to the end and renders one line per token.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        for token in Scanner::new(source) {
            // writing into a String cannot fail
            let _ = self.write_one(&mut out, source, &token);
        }
        out
    }

    fn write_one(&self, out: &mut String, source: &str, token: &Token) -> std::fmt::Result {
        let colr = if self.color { self.color(token.kind) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        if token.kind == TokenKind::Eof {
            return writeln!(out, "[{:04}] {}EOF{}", token.line, colr, reset);
        }

        write!(out, "[{:04}] {}{:<13}", token.line, colr, token.kind.name())?;
        match token.lexeme {
            Lexeme::Error(message) => writeln!(out, " {}{}", message, reset),
            Lexeme::Source { .. } => writeln!(out, " '{}'{}", token.text(source), reset),
        }
    }

    fn color(&self, kind: TokenKind) -> &'static str {
        use TokenKind::*;
        match kind {
            Eof => Self::DIM,
            Error => Self::RED,
            String => Self::GRN,
            Number => Self::CYN,
            Identifier => Self::YEL,
            Minus | Plus | Slash | Star | Bang | BangEqual | Equal | EqualEqual | Greater
            | GreaterEqual | Less | LessEqual => Self::MAG,
            k if k.is_keyword() => Self::BLU,
            _ => Self::RESET,
        }
    }
}

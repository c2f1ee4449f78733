use log::debug;

use crate::{
    bytecode::{
        Chunk, OpCode,
        compile_error::{CompileError, Diagnostic},
    },
    frontend::{Lexeme, Scanner, Token, TokenKind},
    lang::value::Value,
};

/// Compiles `source` straight into `chunk`, with no syntax tree in between.
///
/// On error the chunk may hold a partial instruction stream and must not be
/// executed.
pub fn compile(source: &str, chunk: &mut Chunk) -> Result<(), CompileError> {
    let mut parser = Parser::new(source, chunk);

    parser.advance();
    parser.expression();
    parser.consume(TokenKind::Eof, "Expected end of expression.");
    parser.end_compiler();

    parser.finish()
}

/// Binding power, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // . ()
    Primary,
}

impl Precedence {
    /// One level tighter; `Primary` is the ceiling.
    pub fn next(self) -> Self {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Parse actions a token can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFn {
    Grouping,
    Unary,
    Binary,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub precedence: Precedence,
}

const fn parse_rule(
    prefix: Option<ParseFn>,
    infix: Option<ParseFn>,
    precedence: Precedence,
) -> ParseRule {
    ParseRule {
        prefix,
        infix,
        precedence,
    }
}

/// The Pratt table. Levels on tokens without an infix action are reserved
/// for grammar that does not exist yet; they never continue an infix loop.
pub fn rule(kind: TokenKind) -> ParseRule {
    use ParseFn::*;
    use TokenKind as T;
    match kind {
        T::LeftParen => parse_rule(Some(Grouping), None, Precedence::Call),
        T::Dot => parse_rule(None, None, Precedence::Call),
        T::Minus => parse_rule(Some(Unary), Some(Binary), Precedence::Term),
        T::Plus => parse_rule(None, Some(Binary), Precedence::Term),
        T::Slash | T::Star => parse_rule(None, Some(Binary), Precedence::Factor),
        T::BangEqual | T::EqualEqual => parse_rule(None, None, Precedence::Equality),
        T::Greater | T::GreaterEqual | T::Less | T::LessEqual => {
            parse_rule(None, None, Precedence::Comparison)
        }
        T::Number => parse_rule(Some(Number), None, Precedence::None),
        T::And => parse_rule(None, None, Precedence::And),
        T::Or => parse_rule(None, None, Precedence::Or),
        T::RightParen
        | T::LeftBrace
        | T::RightBrace
        | T::Comma
        | T::Semicolon
        | T::Bang
        | T::Equal
        | T::Identifier
        | T::String
        | T::Class
        | T::Else
        | T::False
        | T::For
        | T::Fun
        | T::If
        | T::Nil
        | T::Print
        | T::Return
        | T::Super
        | T::This
        | T::True
        | T::Var
        | T::While
        | T::Error
        | T::Eof => parse_rule(None, None, Precedence::None),
    }
}

struct Parser<'src, 'c> {
    scanner: Scanner<'src>,
    chunk: &'c mut Chunk,
    current: Token,
    previous: Token,
    had_error: bool,
    /// Set by the first report; hides later reports until a synchronization
    /// point. Bare expressions have none, so it stays set.
    panic_mode: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'src, 'c> Parser<'src, 'c> {
    fn new(source: &'src str, chunk: &'c mut Chunk) -> Self {
        let start = Token {
            kind: TokenKind::Eof,
            lexeme: Lexeme::Source { start: 0, len: 0 },
            line: 1,
        };

        Parser {
            scanner: Scanner::new(source),
            chunk,
            current: start,
            previous: start,
            had_error: false,
            panic_mode: false,
            diagnostics: Vec::new(),
        }
    }

    fn finish(self) -> Result<(), CompileError> {
        if self.had_error {
            Err(CompileError {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(())
        }
    }

    // Diagnostics

    fn error_at(&mut self, token: Token, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let diagnostic = Diagnostic::at(&token, self.scanner.source(), message);
        debug!("compile error reported: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    // Token stream

    fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.scanner.scan_token();
            match self.current.lexeme {
                Lexeme::Error(message) => self.error_at_current(message),
                Lexeme::Source { .. } => break,
            }
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    // Emission

    fn emit_op(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.previous.line);
    }

    fn make_constant(&mut self, value: Value) -> u16 {
        let index = self.chunk.add_constant(value);
        match u16::try_from(index) {
            Ok(index) => index,
            Err(_) => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.chunk.write_constant(index, self.previous.line);
    }

    fn end_compiler(&mut self) {
        self.emit_op(OpCode::Return);
        debug!(
            "compiled {} bytes, {} constants",
            self.chunk.len(),
            self.chunk.constants().len()
        );
    }

    // Grammar

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, min: Precedence) {
        self.advance();
        let Some(prefix) = rule(self.previous.kind).prefix else {
            self.error("Expected expression.");
            return;
        };
        self.apply(prefix);

        loop {
            let next = rule(self.current.kind);
            let Some(infix) = next.infix else { break };
            if next.precedence < min {
                break;
            }
            self.advance();
            self.apply(infix);
        }
    }

    fn apply(&mut self, action: ParseFn) {
        match action {
            ParseFn::Grouping => self.grouping(),
            ParseFn::Unary => self.unary(),
            ParseFn::Binary => self.binary(),
            ParseFn::Number => self.number(),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expected ')' after expression.");
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;

        // operand first, so the VM sees it on the stack
        self.parse_precedence(Precedence::Unary);

        if operator == TokenKind::Minus {
            self.emit_op(OpCode::Negate);
        }
    }

    fn binary(&mut self) {
        let operator = self.previous.kind;
        self.parse_precedence(rule(operator).precedence.next());

        let op = match operator {
            TokenKind::Plus => OpCode::Add,
            TokenKind::Minus => OpCode::Subtract,
            TokenKind::Star => OpCode::Multiply,
            TokenKind::Slash => OpCode::Divide,
            _ => return,
        };
        self.emit_op(op);
    }

    fn number(&mut self) {
        let text = self.previous.text(self.scanner.source());
        match text.parse::<f64>() {
            Ok(n) => self.emit_constant(Value::Number(n)),
            Err(_) => self.error("Invalid number literal."),
        }
    }
}

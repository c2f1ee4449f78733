use crate::frontend::token::{Lexeme, Token, TokenKind};

/// On-demand tokenizer over an immutable source buffer.
///
/// Tokens borrow nothing: they hold byte offsets into `source`, so the
/// buffer must stay alive and unchanged while its tokens are in use.
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    fn bytes(&self) -> &'src [u8] {
        self.source.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.current).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes().get(self.current + 1).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.current += 1;
        }
        byte
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            lexeme: Lexeme::Source {
                start: self.start,
                len: self.current - self.start,
            },
            line: self.line,
        }
    }

    fn error_token(&self, message: &'static str) -> Token {
        Token {
            kind: TokenKind::Error,
            lexeme: Lexeme::Error(message),
            line: self.line,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' if self.peek_next() == Some(b'/') => {
                    while !matches!(self.peek(), Some(b'\n') | None) {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn read_string(&mut self) -> Token {
        loop {
            match self.peek() {
                Some(b'"') => break,
                Some(b'\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
                None => return self.error_token("Unterminated string."),
            }
        }

        // closing quote
        self.advance();
        self.make_token(TokenKind::String)
    }

    fn read_number(&mut self) -> Token {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }

        // Only treat '.' as a decimal point if followed by a digit
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    fn read_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let kind = match &self.source[self.start..self.current] {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => TokenKind::Identifier,
        };

        self.make_token(kind)
    }

    /// Skips an unrecognised character whole, so later offsets stay on
    /// UTF-8 boundaries.
    fn skip_unexpected(&mut self) {
        let width = self.source[self.start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.current = self.start + width;
    }

    /// Produces the next token. Once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;

        let Some(byte) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        if byte.is_ascii_alphabetic() || byte == b'_' {
            return self.read_identifier();
        }
        if byte.is_ascii_digit() {
            return self.read_number();
        }

        let kind = match byte {
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'{' => TokenKind::LeftBrace,
            b'}' => TokenKind::RightBrace,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b'-' => TokenKind::Minus,
            b'+' => TokenKind::Plus,
            b'/' => TokenKind::Slash,
            b'*' => TokenKind::Star,
            b'!' if self.match_byte(b'=') => TokenKind::BangEqual,
            b'!' => TokenKind::Bang,
            b'=' if self.match_byte(b'=') => TokenKind::EqualEqual,
            b'=' => TokenKind::Equal,
            b'<' if self.match_byte(b'=') => TokenKind::LessEqual,
            b'<' => TokenKind::Less,
            b'>' if self.match_byte(b'=') => TokenKind::GreaterEqual,
            b'>' => TokenKind::Greater,
            b'"' => return self.read_string(),
            _ => {
                self.skip_unexpected();
                return self.error_token("Unexpected character.");
            }
        };

        self.make_token(kind)
    }
}

/// Yields tokens up to and including the first `Eof`.
impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

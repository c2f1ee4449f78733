pub mod scanner;
pub mod token;
pub mod token_dumper;

pub use scanner::Scanner;
pub use token::{Lexeme, Token, TokenKind};

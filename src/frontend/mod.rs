pub mod diagnostic;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod program;
pub mod token;
pub mod token_type;

pub use position::Position;
pub use token::Token;
pub use token_type::TokenType;

use crate::frontend::diagnostic::Diagnostic;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::program::Program;

/// Parses script text into a program, or returns the collected diagnostics.
pub fn parse(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

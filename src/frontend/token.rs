use std::fmt;

use super::position::Position;
use super::token_type::TokenType;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub position: Position,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        literal: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            position: Position::new(line, column),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, {:?}, {})",
            self.token_type, self.literal, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token_type::lookup_word;

    #[test]
    fn test_token_new() {
        let tok = Token::new(TokenType::Push, "push", 1, 5);
        assert_eq!(tok.token_type, TokenType::Push);
        assert_eq!(tok.literal, "push");
        assert_eq!(tok.position.line, 1);
        assert_eq!(tok.position.column, 5);
    }

    #[test]
    fn test_token_display() {
        let tok = Token::new(TokenType::Push, "push", 1, 5);
        let s = format!("{}", tok);
        assert!(s.contains("push"));
        assert!(s.contains("1:5"));
    }

    #[test]
    fn test_lookup_word() {
        assert_eq!(lookup_word("map"), Some(TokenType::Map));
        assert_eq!(lookup_word(">="), Some(TokenType::Gte));
        assert_eq!(lookup_word("nil"), Some(TokenType::Nil));
        assert_eq!(lookup_word("frobnicate"), None);
    }
}

use crate::frontend::token::Token;
use crate::frontend::token_type::{TokenType, lookup_word};

/// The trawl lexer.
///
/// Scripts are whitespace-delimited word streams: bare words name
/// instructions, `"` starts a string, digits (optionally preceded by `-` or
/// `.`) start a number, and `[ ] { }` delimit array and block literals.
/// `;` starts a comment that runs to end of line. A leading `#!` line is
/// skipped so scripts can carry a shebang.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    current_char: Option<char>,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        let mut lexer = Self {
            input: input.into().chars().collect(),
            position: 0,
            read_position: 0,
            current_char: None,
            line: 1,
            column: 0,
        };
        lexer.read_char();

        // Shebang line, if any, is not part of the script
        if lexer.current_char == Some('#') && lexer.peek_char() == Some('!') {
            while lexer.current_char.is_some() && lexer.current_char != Some('\n') {
                lexer.read_char();
            }
        }

        lexer
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_ignorable();

        let line = self.line;
        let col = self.column;

        let token = match self.current_char {
            // Delimiters terminate words, so they are always single tokens
            Some('[') => Token::new(TokenType::LBracket, "[", line, col),
            Some(']') => Token::new(TokenType::RBracket, "]", line, col),
            Some('{') => Token::new(TokenType::LBrace, "{", line, col),
            Some('}') => Token::new(TokenType::RBrace, "}", line, col),

            // String literals
            Some('"') => {
                return self.read_string();
            }

            // Numbers, including leading `-` and leading `.` forms
            Some(ch) if ch.is_ascii_digit() || ch == '.' => {
                return self.read_number();
            }
            Some('-')
                if self
                    .peek_char()
                    .is_some_and(|ch| ch.is_ascii_digit() || ch == '.') =>
            {
                return self.read_number();
            }

            // End of file
            None => Token::new(TokenType::Eof, "", line, col),

            // Everything else is a word: instruction names, operators,
            // literal keywords, or an unknown (illegal) word
            Some(_) => {
                return self.read_word();
            }
        };

        self.read_char();
        token
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn read_char(&mut self) {
        // Column tracks the position of current_char, 1-based. Advancing past
        // a newline resets it for the first character of the next line.
        if self.current_char == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        self.current_char = if self.read_position >= self.input.len() {
            None
        } else {
            Some(self.input[self.read_position])
        };

        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn skip_ignorable(&mut self) {
        loop {
            // Whitespace
            while matches!(self.current_char, Some(c) if c.is_whitespace()) {
                self.read_char();
            }

            // Comments: `;` to end of line
            if self.current_char == Some(';') {
                while self.current_char.is_some() && self.current_char != Some('\n') {
                    self.read_char();
                }
                continue; // there may be whitespace/comments again
            }

            break;
        }
    }

    /// Read a number literal: digits with at most one `.`, optionally
    /// preceded by `-`. The literal is parsed to `f64` later, so malformed
    /// forms like a bare `.` surface as parser diagnostics, not lexer errors.
    fn read_number(&mut self) -> Token {
        let line = self.line;
        let col = self.column;
        let start = self.position;

        if self.current_char == Some('-') {
            self.read_char();
        }

        let mut found_dot = false;
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                self.read_char();
            } else if ch == '.' && !found_dot {
                found_dot = true;
                self.read_char();
            } else {
                break;
            }
        }

        let literal: String = self.input[start..self.position].iter().collect();
        Token::new(TokenType::Number, literal, line, col)
    }

    /// Read a string literal. Strings have no escape sequences and may span
    /// lines. Hitting EOF before the closing quote yields an
    /// UnterminatedString token for the parser to report.
    fn read_string(&mut self) -> Token {
        let line = self.line;
        let col = self.column;
        self.read_char(); // skip opening quote

        let mut content = String::new();
        loop {
            match self.current_char {
                Some('"') => {
                    self.read_char(); // consume closing quote
                    return Token::new(TokenType::String, content, line, col);
                }
                Some(ch) => {
                    content.push(ch);
                    self.read_char();
                }
                None => {
                    return Token::new(TokenType::UnterminatedString, content, line, col);
                }
            }
        }
    }

    /// Read a bare word up to the next whitespace, quote, or delimiter.
    fn read_word(&mut self) -> Token {
        let line = self.line;
        let col = self.column;
        let start = self.position;

        while let Some(ch) = self.current_char {
            if ch.is_whitespace() || ch == '"' || is_delimiter(ch) {
                break;
            }
            self.read_char();
        }

        let word: String = self.input[start..self.position].iter().collect();
        match lookup_word(&word) {
            Some(token_type) => Token::new(token_type, word, line, col),
            None => Token::new(TokenType::Illegal, word, line, col),
        }
    }
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, '[' | ']' | '{' | '}')
}

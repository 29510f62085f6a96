use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Special
    Illegal,
    UnterminatedString,
    Eof,

    // Literals
    Number,
    String,
    True,
    False,
    Nil,

    // Delimiters
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Stack words
    Push,
    Dup,
    Swap,
    Drop,

    // Register words
    ILoad,
    Load,

    // Host bridge words
    Query,
    Info,

    // Combinators
    Map,
    Filter,
    Reduce,
    Each,

    // Conversions
    ToStr,
    ToNum,

    // Arithmetic
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,

    // Comparison
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,

    // Logical
    And,
    Or,
    Not,

    // String and list words
    Concat,
    Match,
    Split,
    Iota,
    Reverse,
}

/// Maps a bare word to its token type. Returns `None` for unknown words,
/// which the lexer reports as `Illegal`.
pub fn lookup_word(word: &str) -> Option<TokenType> {
    let token_type = match word {
        "true" => TokenType::True,
        "false" => TokenType::False,
        "nil" => TokenType::Nil,
        "push" => TokenType::Push,
        "dup" => TokenType::Dup,
        "swap" => TokenType::Swap,
        "drop" => TokenType::Drop,
        "iload" => TokenType::ILoad,
        "load" => TokenType::Load,
        "query" => TokenType::Query,
        "info" => TokenType::Info,
        "map" => TokenType::Map,
        "filter" => TokenType::Filter,
        "reduce" => TokenType::Reduce,
        "each" => TokenType::Each,
        "tostr" => TokenType::ToStr,
        "tonum" => TokenType::ToNum,
        "+" => TokenType::Plus,
        "-" => TokenType::Minus,
        "*" => TokenType::Asterisk,
        "/" => TokenType::Slash,
        "%" => TokenType::Percent,
        "=" => TokenType::Eq,
        "!=" => TokenType::NotEq,
        ">" => TokenType::Gt,
        ">=" => TokenType::Gte,
        "<" => TokenType::Lt,
        "<=" => TokenType::Lte,
        "and" => TokenType::And,
        "or" => TokenType::Or,
        "not" => TokenType::Not,
        "concat" => TokenType::Concat,
        "match" => TokenType::Match,
        "split" => TokenType::Split,
        "iota" => TokenType::Iota,
        "reverse" => TokenType::Reverse,
        _ => return None,
    };
    Some(token_type)
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // Special
            TokenType::Illegal => "ILLEGAL",
            TokenType::UnterminatedString => "UNTERMINATED STRING",
            TokenType::Eof => "EOF",

            // Literals
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::Nil => "nil",

            // Delimiters
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",

            // Stack words
            TokenType::Push => "push",
            TokenType::Dup => "dup",
            TokenType::Swap => "swap",
            TokenType::Drop => "drop",

            // Register words
            TokenType::ILoad => "iload",
            TokenType::Load => "load",

            // Host bridge words
            TokenType::Query => "query",
            TokenType::Info => "info",

            // Combinators
            TokenType::Map => "map",
            TokenType::Filter => "filter",
            TokenType::Reduce => "reduce",
            TokenType::Each => "each",

            // Conversions
            TokenType::ToStr => "tostr",
            TokenType::ToNum => "tonum",

            // Arithmetic
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Asterisk => "*",
            TokenType::Slash => "/",
            TokenType::Percent => "%",

            // Comparison
            TokenType::Eq => "=",
            TokenType::NotEq => "!=",
            TokenType::Gt => ">",
            TokenType::Gte => ">=",
            TokenType::Lt => "<",
            TokenType::Lte => "<=",

            // Logical
            TokenType::And => "and",
            TokenType::Or => "or",
            TokenType::Not => "not",

            // String and list words
            TokenType::Concat => "concat",
            TokenType::Match => "match",
            TokenType::Split => "split",
            TokenType::Iota => "iota",
            TokenType::Reverse => "reverse",
        };
        write!(f, "{}", s)
    }
}

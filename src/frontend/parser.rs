use std::rc::Rc;

use crate::frontend::{
    diagnostic::Diagnostic,
    instruction::{Instruction, Op},
    lexer::Lexer,
    program::Program,
    token::Token,
    token_type::TokenType,
};
use crate::runtime::value::Value;

/// Recursive-descent parser for the instruction stream.
///
/// The grammar is flat: a program is a sequence of instruction words, where
/// `push` takes one literal operand and `iload` takes a register number and a
/// literal. Literals are numbers, strings, `nil`, `true`, `false`, `[ ... ]`
/// arrays of literals, and `{ ... }` blocks of instructions.
///
/// Errors are collected as diagnostics; parsing resynchronizes and continues
/// so one mistake does not hide the rest of the script.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peek_token: Token,
    pub errors: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut parser = Parser {
            lexer,
            current_token: Token::new(TokenType::Eof, "", 0, 0),
            peek_token: Token::new(TokenType::Eof, "", 0, 0),
            errors: Vec::new(),
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while self.current_token.token_type != TokenType::Eof {
            if let Some(instruction) = self.parse_instruction() {
                program.instructions.push(instruction);
            }
        }

        program
    }

    fn next_token(&mut self) {
        self.current_token = self.peek_token.clone();
        self.peek_token = self.lexer.next_token();
    }

    fn synchronize_after_error(&mut self) {
        // Skip ahead to the next plausible instruction boundary so a single
        // mistake inside a literal does not cascade.
        while !matches!(
            self.current_token.token_type,
            TokenType::Eof | TokenType::RBrace | TokenType::RBracket
        ) {
            if starts_instruction(self.current_token.token_type) {
                break;
            }
            self.next_token();
        }
    }

    /// Parses one instruction. On error the diagnostic is recorded, the
    /// parser advances past the offending tokens, and `None` is returned.
    fn parse_instruction(&mut self) -> Option<Instruction> {
        let position = self.current_token.position;

        match self.current_token.token_type {
            TokenType::Push => {
                self.next_token();
                let Some(value) = self.parse_value() else {
                    self.synchronize_after_error();
                    return None;
                };
                Some(Instruction::new(Op::Push(value), position))
            }
            TokenType::ILoad => {
                self.next_token();
                let Some(register) = self.parse_register() else {
                    self.synchronize_after_error();
                    return None;
                };
                let Some(value) = self.parse_value() else {
                    self.synchronize_after_error();
                    return None;
                };
                Some(Instruction::new(Op::ILoad(register, value), position))
            }
            TokenType::Illegal => {
                self.errors.push(
                    Diagnostic::error(format!("unknown word `{}`", self.current_token.literal))
                        .with_position(position),
                );
                self.next_token();
                None
            }
            TokenType::UnterminatedString => {
                self.errors.push(
                    Diagnostic::error("unterminated string")
                        .with_position(position)
                        .with_hint("Close it with `\"`."),
                );
                self.next_token();
                None
            }
            other => {
                if let Some(op) = simple_op(other) {
                    self.next_token();
                    Some(Instruction::new(op, position))
                } else {
                    self.errors.push(
                        Diagnostic::error(format!(
                            "unexpected token `{}`, expected an instruction",
                            self.current_token.literal
                        ))
                        .with_position(position),
                    );
                    self.next_token();
                    None
                }
            }
        }
    }

    /// Parses one literal value, leaving the parser at the following token.
    fn parse_value(&mut self) -> Option<Value> {
        let position = self.current_token.position;

        match self.current_token.token_type {
            TokenType::Number => {
                let literal = self.current_token.literal.clone();
                self.next_token();
                match literal.parse::<f64>() {
                    Ok(number) => Some(Value::Number(number)),
                    Err(_) => {
                        self.errors.push(
                            Diagnostic::error(format!("malformed number `{}`", literal))
                                .with_position(position),
                        );
                        None
                    }
                }
            }
            TokenType::String => {
                let literal = self.current_token.literal.clone();
                self.next_token();
                Some(Value::String(Rc::from(literal)))
            }
            TokenType::True => {
                self.next_token();
                Some(Value::Bool(true))
            }
            TokenType::False => {
                self.next_token();
                Some(Value::Bool(false))
            }
            TokenType::Nil => {
                self.next_token();
                Some(Value::Null)
            }
            TokenType::LBracket => self.parse_array(),
            TokenType::LBrace => self.parse_block(),
            TokenType::Illegal => {
                self.errors.push(
                    Diagnostic::error(format!("unknown word `{}`", self.current_token.literal))
                        .with_position(position),
                );
                self.next_token();
                None
            }
            TokenType::UnterminatedString => {
                self.errors.push(
                    Diagnostic::error("unterminated string")
                        .with_position(position)
                        .with_hint("Close it with `\"`."),
                );
                self.next_token();
                None
            }
            TokenType::Eof => {
                self.errors.push(
                    Diagnostic::error("unexpected end of input, expected a value")
                        .with_position(position),
                );
                None
            }
            _ => {
                self.errors.push(
                    Diagnostic::error(format!(
                        "unexpected token `{}`, expected a value",
                        self.current_token.literal
                    ))
                    .with_position(position),
                );
                self.next_token();
                None
            }
        }
    }

    /// Parses `iload`'s register operand: an integer 0 through 255.
    fn parse_register(&mut self) -> Option<u8> {
        let position = self.current_token.position;

        if self.current_token.token_type != TokenType::Number {
            self.errors.push(
                Diagnostic::error(format!(
                    "expected a register number, got `{}`",
                    self.current_token.literal
                ))
                .with_position(position)
                .with_message("`iload` takes a register number and a value, e.g. `iload 0 {+}`."),
            );
            return None;
        }

        let literal = self.current_token.literal.clone();
        self.next_token();

        let Ok(number) = literal.parse::<f64>() else {
            self.errors.push(
                Diagnostic::error(format!("malformed number `{}`", literal))
                    .with_position(position),
            );
            return None;
        };

        if number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
            self.errors.push(
                Diagnostic::error(format!("register out of range: `{}`", literal))
                    .with_position(position)
                    .with_message("Registers are numbered 0 through 255."),
            );
            return None;
        }

        Some(number as u8)
    }

    fn parse_array(&mut self) -> Option<Value> {
        let open_position = self.current_token.position;
        self.next_token(); // consume '['

        let mut values = Vec::new();
        loop {
            match self.current_token.token_type {
                TokenType::RBracket => {
                    self.next_token();
                    return Some(Value::List(Rc::new(values)));
                }
                TokenType::Eof => {
                    self.errors.push(
                        Diagnostic::error("unterminated array literal")
                            .with_position(open_position)
                            .with_hint("Close it with `]`."),
                    );
                    return None;
                }
                _ => {
                    values.push(self.parse_value()?);
                }
            }
        }
    }

    fn parse_block(&mut self) -> Option<Value> {
        let open_position = self.current_token.position;
        self.next_token(); // consume '{'

        let mut body = Vec::new();
        loop {
            match self.current_token.token_type {
                TokenType::RBrace => {
                    self.next_token();
                    return Some(Value::Function(Rc::from(body)));
                }
                TokenType::Eof => {
                    self.errors.push(
                        Diagnostic::error("unterminated block")
                            .with_position(open_position)
                            .with_hint("Close it with `}`."),
                    );
                    return None;
                }
                _ => {
                    if let Some(instruction) = self.parse_instruction() {
                        body.push(instruction);
                    }
                }
            }
        }
    }
}

fn simple_op(token_type: TokenType) -> Option<Op> {
    let op = match token_type {
        TokenType::Dup => Op::Dup,
        TokenType::Swap => Op::Swap,
        TokenType::Drop => Op::Drop,
        TokenType::Load => Op::Load,
        TokenType::Query => Op::Query,
        TokenType::Info => Op::Info,
        TokenType::Map => Op::Map,
        TokenType::Filter => Op::Filter,
        TokenType::Reduce => Op::Reduce,
        TokenType::Each => Op::Each,
        TokenType::ToStr => Op::ToStr,
        TokenType::ToNum => Op::ToNum,
        TokenType::Plus => Op::Add,
        TokenType::Minus => Op::Sub,
        TokenType::Asterisk => Op::Mul,
        TokenType::Slash => Op::Div,
        TokenType::Percent => Op::Mod,
        TokenType::Eq => Op::Eq,
        TokenType::NotEq => Op::NotEq,
        TokenType::Gt => Op::Greater,
        TokenType::Gte => Op::GreaterEq,
        TokenType::Lt => Op::Less,
        TokenType::Lte => Op::LessEq,
        TokenType::And => Op::And,
        TokenType::Or => Op::Or,
        TokenType::Not => Op::Not,
        TokenType::Concat => Op::Concat,
        TokenType::Match => Op::Match,
        TokenType::Split => Op::Split,
        TokenType::Iota => Op::Iota,
        TokenType::Reverse => Op::Reverse,
        _ => return None,
    };
    Some(op)
}

fn starts_instruction(token_type: TokenType) -> bool {
    matches!(token_type, TokenType::Push | TokenType::ILoad) || simple_op(token_type).is_some()
}

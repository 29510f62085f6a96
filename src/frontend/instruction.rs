use std::fmt;

use crate::frontend::position::Position;
use crate::runtime::value::Value;

/// A single instruction of the flat program stream.
///
/// Operands beyond `push` and `iload` immediates are taken from the operand
/// stack at run time, so most variants carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // Stack
    Push(Value),
    Dup,
    Swap,
    Drop,

    // Registers
    ILoad(u8, Value),
    Load,

    // Host bridge
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
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,

    // Logical
    And,
    Or,
    Not,

    // Strings and lists
    Concat,
    Match,
    Split,
    Iota,
    Reverse,
}

impl Op {
    /// The source word for this instruction.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Push(_) => "push",
            Op::Dup => "dup",
            Op::Swap => "swap",
            Op::Drop => "drop",
            Op::ILoad(_, _) => "iload",
            Op::Load => "load",
            Op::Query => "query",
            Op::Info => "info",
            Op::Map => "map",
            Op::Filter => "filter",
            Op::Reduce => "reduce",
            Op::Each => "each",
            Op::ToStr => "tostr",
            Op::ToNum => "tonum",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Eq => "=",
            Op::NotEq => "!=",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Concat => "concat",
            Op::Match => "match",
            Op::Split => "split",
            Op::Iota => "iota",
            Op::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Push(value) => write!(f, "push {}", value),
            Op::ILoad(register, value) => write!(f, "iload {} {}", register, value),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub op: Op,
    pub position: Position,
}

impl Instruction {
    pub fn new(op: Op, position: Position) -> Self {
        Self { op, position }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)
    }
}
